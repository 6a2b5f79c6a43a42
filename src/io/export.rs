//! Export per-lap results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or charting
//! scripts: one row per simulated lap, in simulation order.

use std::path::Path;

use serde::Serialize;

use crate::domain::{Compound, RaceResult};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct LapRow {
    lap: u32,
    /// 1-based stint number.
    stint: usize,
    compound: Compound,
    laps_on_tire: u32,
    lap_time: f64,
}

/// Write per-lap results to a CSV file.
pub fn write_laps_csv(path: &Path, result: &RaceResult) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for r in &result.laps {
        writer
            .serialize(LapRow {
                lap: r.lap,
                stint: r.stint + 1,
                compound: r.compound,
                laps_on_tire: r.laps_on_tire,
                lap_time: r.lap_time,
            })
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = result.laps.len(), "wrote lap CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CircuitProfile, Stint, StrategyCatalog};
    use crate::sim::simulate;

    #[test]
    fn writes_header_and_one_row_per_lap() {
        let catalog = StrategyCatalog::builtin();
        let circuit = CircuitProfile {
            name: "Test".to_string(),
            total_laps: 3,
            base_lap_time: 90.0,
        };
        let result = simulate(
            &circuit,
            &catalog.compounds,
            &[Stint::new(1, 1, Compound::Hard), Stint::new(2, 3, Compound::Soft)],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("strat_laps_{}.csv", std::process::id()));
        write_laps_csv(&path, &result).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "lap,stint,compound,laps_on_tire,lap_time");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1,1,hard,1,90.1"));
        assert!(lines[3].starts_with("3,2,soft,2,90.6"));
    }
}
