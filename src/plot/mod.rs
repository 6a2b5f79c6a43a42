//! Terminal plotting.
//!
//! - fixed-grid ASCII lap-time chart (`ascii`)

pub mod ascii;

pub use ascii::*;
