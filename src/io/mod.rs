//! Input/output helpers.
//!
//! - catalog config loading + validation (`config`)
//! - per-lap CSV exports (`export`)
//! - race JSON read/write (`race`)

pub mod config;
pub mod export;
pub mod race;

pub use config::*;
pub use export::*;
pub use race::*;
