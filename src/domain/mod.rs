//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration tables (`CircuitProfile`, `CompoundSpec`, `StrategyCatalog`)
//! - strategy inputs (`Compound`, `Stint`)
//! - simulation outputs (`LapRecord`, `RaceResult`, `StintSummary`, `RaceDuration`)

pub mod types;

pub use types::*;
