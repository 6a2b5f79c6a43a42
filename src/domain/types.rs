//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - passed into the simulator as explicit configuration
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Tire compound.
///
/// The set is closed; per-compound wear characteristics live in a
/// [`CompoundTable`] keyed by [`Compound::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    /// Identifier used as the key in compound tables and config files.
    pub fn id(self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Compound::Soft => "Soft",
            Compound::Medium => "Medium",
            Compound::Hard => "Hard",
        }
    }

    /// Single-character marker used by the ASCII chart.
    pub fn glyph(self) -> char {
        match self {
            Compound::Soft => 'S',
            Compound::Medium => 'M',
            Compound::Hard => 'H',
        }
    }

    /// Chart color as an RGB triple.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Compound::Soft => (255, 99, 132),
            Compound::Medium => (255, 206, 86),
            Compound::Hard => (75, 192, 192),
        }
    }

    pub fn next(self) -> Compound {
        match self {
            Compound::Soft => Compound::Medium,
            Compound::Medium => Compound::Hard,
            Compound::Hard => Compound::Soft,
        }
    }

    pub fn prev(self) -> Compound {
        match self {
            Compound::Soft => Compound::Hard,
            Compound::Medium => Compound::Soft,
            Compound::Hard => Compound::Medium,
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Compound {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Compound::ALL
            .into_iter()
            .find(|c| c.id() == key)
            .ok_or_else(|| StrategyError::UnknownCompound(s.trim().to_string()))
    }
}

/// A circuit the race is run on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitProfile {
    pub name: String,
    pub total_laps: u32,
    /// Lap time on fresh tires (seconds).
    pub base_lap_time: f64,
}

/// Wear characteristics of one compound.
///
/// Degradation has two linear regimes: `degradation_rate` applies for the
/// whole tire life and `over_limit_rate` is added for every lap beyond
/// `wear_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundSpec {
    /// Seconds added per lap on the tire.
    pub degradation_rate: f64,
    /// Laps before accelerated wear begins.
    pub wear_limit: u32,
    /// Additional seconds per lap beyond `wear_limit`.
    pub over_limit_rate: f64,
}

/// Compound specs keyed by [`Compound::id`].
pub type CompoundTable = BTreeMap<String, CompoundSpec>;

/// Circuit profiles keyed by circuit identifier (e.g. `silverstone`).
pub type CircuitTable = BTreeMap<String, CircuitProfile>;

/// Static configuration tables consumed by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCatalog {
    pub circuits: CircuitTable,
    pub compounds: CompoundTable,
}

impl StrategyCatalog {
    /// Built-in circuits and compounds.
    pub fn builtin() -> Self {
        let mut circuits = CircuitTable::new();
        circuits.insert(
            "monaco".to_string(),
            CircuitProfile {
                name: "Monaco".to_string(),
                total_laps: 78,
                base_lap_time: 75.0,
            },
        );
        circuits.insert(
            "silverstone".to_string(),
            CircuitProfile {
                name: "Silverstone".to_string(),
                total_laps: 52,
                base_lap_time: 90.0,
            },
        );

        let mut compounds = CompoundTable::new();
        for (compound, degradation_rate, wear_limit) in [
            (Compound::Soft, 0.3, 22),
            (Compound::Medium, 0.2, 30),
            (Compound::Hard, 0.1, 35),
        ] {
            compounds.insert(
                compound.id().to_string(),
                CompoundSpec {
                    degradation_rate,
                    wear_limit,
                    over_limit_rate: 0.8,
                },
            );
        }

        Self { circuits, compounds }
    }

    pub fn circuit(&self, id: &str) -> Result<&CircuitProfile, StrategyError> {
        self.circuits
            .get(id)
            .ok_or_else(|| StrategyError::InvalidCircuit(id.to_string()))
    }

    pub fn compound(&self, compound: Compound) -> Result<&CompoundSpec, StrategyError> {
        lookup_compound(&self.compounds, compound)
    }

    /// Circuit ids in table order.
    pub fn circuit_ids(&self) -> Vec<&str> {
        self.circuits.keys().map(String::as_str).collect()
    }
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve a compound in a table, failing with `UnknownCompound` if absent.
pub fn lookup_compound(table: &CompoundTable, compound: Compound) -> Result<&CompoundSpec, StrategyError> {
    table
        .get(compound.id())
        .ok_or_else(|| StrategyError::UnknownCompound(compound.id().to_string()))
}

/// A lap range run on one set of tires.
///
/// Laps are inclusive on both ends. `end_lap < start_lap` is accepted and
/// simply produces no laps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub start_lap: u32,
    pub end_lap: u32,
    pub compound: Compound,
}

impl Stint {
    pub fn new(start_lap: u32, end_lap: u32, compound: Compound) -> Self {
        Self {
            start_lap,
            end_lap,
            compound,
        }
    }

    /// Number of laps the stint simulates (saturates at `u32::MAX`).
    pub fn lap_count(&self) -> u32 {
        if self.end_lap < self.start_lap {
            0
        } else {
            (self.end_lap - self.start_lap).saturating_add(1)
        }
    }
}

impl fmt::Display for Stint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}:{}", self.start_lap, self.end_lap, self.compound)
    }
}

/// One simulated lap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub lap: u32,
    /// Predicted lap time (seconds).
    pub lap_time: f64,
    pub compound: Compound,
    /// Index of the stint that produced this lap.
    pub stint: usize,
    /// Wear counter for this lap (1 on the first lap of a stint).
    pub laps_on_tire: u32,
}

/// Simulation output: laps in simulation order plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub laps: Vec<LapRecord>,
    /// Total race time (seconds).
    pub total_time: f64,
}

impl RaceResult {
    pub fn empty() -> Self {
        Self {
            laps: Vec::new(),
            total_time: 0.0,
        }
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn fastest_lap(&self) -> Option<&LapRecord> {
        self.laps.iter().min_by(|a, b| a.lap_time.total_cmp(&b.lap_time))
    }

    pub fn slowest_lap(&self) -> Option<&LapRecord> {
        self.laps.iter().max_by(|a, b| a.lap_time.total_cmp(&b.lap_time))
    }

    /// Aggregate laps per producing stint.
    ///
    /// Stints that produced no laps are omitted.
    pub fn stint_summaries(&self) -> Vec<StintSummary> {
        let mut out: Vec<StintSummary> = Vec::new();
        for rec in &self.laps {
            match out.last_mut() {
                Some(s) if s.stint == rec.stint => {
                    s.last_lap = rec.lap;
                    s.lap_count += 1;
                    s.total_time += rec.lap_time;
                    s.final_lap_time = rec.lap_time;
                }
                _ => out.push(StintSummary {
                    stint: rec.stint,
                    compound: rec.compound,
                    first_lap: rec.lap,
                    last_lap: rec.lap,
                    lap_count: 1,
                    total_time: rec.lap_time,
                    final_lap_time: rec.lap_time,
                }),
            }
        }
        out
    }
}

/// Per-stint aggregate derived from a [`RaceResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StintSummary {
    pub stint: usize,
    pub compound: Compound,
    pub first_lap: u32,
    pub last_lap: u32,
    pub lap_count: u32,
    pub total_time: f64,
    pub final_lap_time: f64,
}

impl StintSummary {
    pub fn mean_lap_time(&self) -> f64 {
        if self.lap_count == 0 {
            0.0
        } else {
            self.total_time / self.lap_count as f64
        }
    }
}

/// Whole hours/minutes/seconds of a duration (sub-second part truncated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDuration {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
}

impl fmt::Display for RaceDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m {:02}s", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_parses_case_insensitively() {
        assert_eq!("Soft".parse::<Compound>().unwrap(), Compound::Soft);
        assert_eq!(" hard ".parse::<Compound>().unwrap(), Compound::Hard);
    }

    #[test]
    fn unknown_compound_is_reported_by_name() {
        let err = "supersoft".parse::<Compound>().unwrap_err();
        assert_eq!(err, StrategyError::UnknownCompound("supersoft".to_string()));
    }

    #[test]
    fn builtin_catalog_resolves_all_compounds() {
        let catalog = StrategyCatalog::builtin();
        for c in Compound::ALL {
            assert!(catalog.compound(c).is_ok());
        }
        assert_eq!(catalog.circuit("monaco").unwrap().total_laps, 78);
        assert_eq!(catalog.circuit_ids(), vec!["monaco", "silverstone"]);
    }

    #[test]
    fn missing_circuit_is_invalid() {
        let catalog = StrategyCatalog::builtin();
        let err = catalog.circuit("spa").unwrap_err();
        assert_eq!(err, StrategyError::InvalidCircuit("spa".to_string()));
    }

    #[test]
    fn reversed_stint_has_no_laps() {
        assert_eq!(Stint::new(5, 4, Compound::Soft).lap_count(), 0);
        assert_eq!(Stint::new(5, 5, Compound::Soft).lap_count(), 1);
        assert_eq!(Stint::new(0, u32::MAX, Compound::Soft).lap_count(), u32::MAX);
    }

    #[test]
    fn stint_summaries_split_on_stint_index() {
        let lap = |lap, stint, t| LapRecord {
            lap,
            lap_time: t,
            compound: Compound::Soft,
            stint,
            laps_on_tire: 1,
        };
        let result = RaceResult {
            laps: vec![lap(1, 0, 90.0), lap(2, 0, 92.0), lap(3, 1, 91.0)],
            total_time: 273.0,
        };
        let summaries = result.stint_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].lap_count, 2);
        assert_eq!(summaries[0].last_lap, 2);
        assert_eq!(summaries[0].mean_lap_time(), 91.0);
        assert_eq!(summaries[1].first_lap, 3);
        assert_eq!(result.fastest_lap().unwrap().lap, 1);
        assert_eq!(result.slowest_lap().unwrap().lap, 2);
    }

    #[test]
    fn duration_display_pads_minutes_and_seconds() {
        let d = RaceDuration {
            hours: 1,
            minutes: 5,
            seconds: 9,
        };
        assert_eq!(d.to_string(), "1h 05m 09s");
    }
}
