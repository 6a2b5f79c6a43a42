//! Reporting utilities: durations, summaries and tables.

pub mod format;

pub use format::*;
