//! Advisory strategy diagnostics.
//!
//! The simulator accepts any stint list and runs it literally. These checks
//! report the ranges a front-end would normally prevent (reversed stints,
//! laps outside the race, double-covered or uncovered laps) without altering
//! how a strategy is simulated.

use std::fmt;

use crate::domain::{CircuitProfile, Stint};

/// A suspicious feature of a stint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyWarning {
    /// `end_lap < start_lap`; the stint runs no laps.
    EmptyStint { stint: usize },
    /// Stint laps outside `[1, total_laps]`.
    OutOfBounds { stint: usize, first: u32, last: u32 },
    /// Laps covered by more than one stint (reported as the first two).
    Overlap { from: u32, to: u32, first: usize, second: usize },
    /// Race laps not covered by any stint.
    Gap { from: u32, to: u32 },
}

impl fmt::Display for StrategyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StrategyWarning::EmptyStint { stint } => {
                write!(f, "stint {} ends before it starts and runs no laps", stint + 1)
            }
            StrategyWarning::OutOfBounds { stint, first, last } => {
                write!(f, "stint {} runs laps {first}-{last} outside the race distance", stint + 1)
            }
            StrategyWarning::Overlap { from, to, first, second } => write!(
                f,
                "laps {from}-{to} are covered by both stint {} and stint {}",
                first + 1,
                second + 1
            ),
            StrategyWarning::Gap { from, to } => write!(f, "laps {from}-{to} are not covered by any stint"),
        }
    }
}

/// Inspect a strategy against a circuit's race distance.
///
/// Warnings are ordered: per-stint issues first (in stint order), then
/// overlaps and gaps in ascending lap order.
pub fn check_strategy(circuit: &CircuitProfile, stints: &[Stint]) -> Vec<StrategyWarning> {
    let total = circuit.total_laps;
    let mut out = Vec::new();

    for (idx, s) in stints.iter().enumerate() {
        if s.end_lap < s.start_lap {
            out.push(StrategyWarning::EmptyStint { stint: idx });
            continue;
        }
        if s.start_lap == 0 {
            out.push(StrategyWarning::OutOfBounds {
                stint: idx,
                first: 0,
                last: 0,
            });
        }
        if s.end_lap > total {
            out.push(StrategyWarning::OutOfBounds {
                stint: idx,
                first: s.start_lap.max(total + 1),
                last: s.end_lap,
            });
        }
    }

    // owner[lap - 1]: first stint covering each race lap, and the second one if any.
    let mut owner: Vec<(Option<usize>, Option<usize>)> = vec![(None, None); total as usize];
    for (idx, s) in stints.iter().enumerate() {
        if s.end_lap < s.start_lap {
            continue;
        }
        for lap in s.start_lap.max(1)..=s.end_lap.min(total) {
            let slot = &mut owner[(lap - 1) as usize];
            if slot.0.is_none() {
                slot.0 = Some(idx);
            } else if slot.1.is_none() {
                slot.1 = Some(idx);
            }
        }
    }

    let mut lap = 1u32;
    while lap <= total {
        let cur = owner[(lap - 1) as usize];
        let mut to = lap;
        while to < total && owner[to as usize] == cur {
            to += 1;
        }
        match cur {
            (None, _) => out.push(StrategyWarning::Gap { from: lap, to }),
            (Some(first), Some(second)) => out.push(StrategyWarning::Overlap {
                from: lap,
                to,
                first,
                second,
            }),
            (Some(_), None) => {}
        }
        lap = to + 1;
    }

    out
}
