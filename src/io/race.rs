//! Read/write race JSON files.
//!
//! Race JSON is the portable representation of one simulation:
//! - the circuit and stints that were simulated
//! - the lap series and total (`RaceResult`, flattened)
//! - run metadata (tool, generation time)

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CircuitProfile, RaceResult, Stint};
use crate::error::AppError;

/// A saved simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub circuit_id: String,
    pub circuit: CircuitProfile,
    pub stints: Vec<Stint>,
    #[serde(flatten)]
    pub result: RaceResult,
}

impl RaceFile {
    pub fn new(circuit_id: &str, circuit: &CircuitProfile, stints: &[Stint], result: &RaceResult) -> Self {
        Self {
            tool: "strat".to_string(),
            generated_at: Utc::now(),
            circuit_id: circuit_id.to_string(),
            circuit: circuit.clone(),
            stints: stints.to_vec(),
            result: result.clone(),
        }
    }
}

/// Write a race JSON file.
pub fn write_race_json(path: &Path, race: &RaceFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create race JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, race)
        .map_err(|e| AppError::new(2, format!("Failed to write race JSON: {e}")))?;

    tracing::info!(path = %path.display(), laps = race.result.laps.len(), "wrote race JSON");
    Ok(())
}

/// Read a race JSON file.
pub fn read_race_json(path: &Path) -> Result<RaceFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open race JSON '{}': {e}", path.display())))?;
    let race: RaceFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid race JSON: {e}")))?;
    Ok(race)
}
