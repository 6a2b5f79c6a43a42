//! Race simulation.
//!
//! Responsibilities:
//!
//! - run a stint list lap by lap through the degradation model (`strategy`)
//! - flag suspicious stint ranges without changing results (`checks`)

pub mod checks;
pub mod strategy;

pub use checks::*;
pub use strategy::*;
