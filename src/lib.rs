//! `race-strategy` library crate.
//!
//! Estimates race duration for a tire strategy: a circuit plus an ordered list
//! of stints is run lap by lap through a piecewise-linear wear model.
//!
//! The binary (`strat`) is a thin wrapper around this library so that:
//!
//! - the simulation core is testable without spawning processes
//! - front-ends (CLI, TUI) share one pipeline
//! - configuration is passed in explicitly rather than held globally

pub mod app;
pub mod cli;
pub mod domain;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod plot;
pub mod report;
pub mod sim;
pub mod tui;

pub use domain::{
    CircuitProfile, Compound, CompoundSpec, LapRecord, RaceDuration, RaceResult, Stint, StrategyCatalog,
};
pub use error::StrategyError;
pub use models::{lap_penalty, lap_time};
pub use report::format_duration;
pub use sim::{simulate, simulate_circuit};
