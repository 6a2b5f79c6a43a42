//! Lap-time models.
//!
//! Models are implemented as small, pure functions so that the simulator can
//! stay generic over compound tables.

pub mod degradation;

pub use degradation::*;
