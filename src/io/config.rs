//! Catalog configuration (circuits and compounds).
//!
//! Resolution order:
//! - explicit `--config <file>`
//! - `STRAT_CONFIG` (`app::run` loads `.env` before this is read)
//! - the built-in catalog
//!
//! A config file is layered over the built-in catalog: entries with the same
//! id replace the built-in ones, new ids are added.
//!
//! ```json
//! {
//!   "circuits": { "spa": { "name": "Spa", "total_laps": 44, "base_lap_time": 106.0 } },
//!   "compounds": { "soft": { "degradation_rate": 0.35, "wear_limit": 18, "over_limit_rate": 0.9 } }
//! }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{CircuitTable, Compound, CompoundTable, StrategyCatalog};
use crate::error::AppError;

/// Environment variable naming a catalog JSON file.
pub const CONFIG_ENV: &str = "STRAT_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    circuits: CircuitTable,
    #[serde(default)]
    compounds: CompoundTable,
}

/// Load the catalog for this invocation.
pub fn load_catalog(explicit: Option<&Path>) -> Result<StrategyCatalog, AppError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => read_catalog_json(&path),
        None => {
            tracing::debug!("using built-in catalog");
            Ok(StrategyCatalog::builtin())
        }
    }
}

/// Read a catalog JSON file and layer it over the built-in catalog.
pub fn read_catalog_json(path: &Path) -> Result<StrategyCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config '{}': {e}", path.display())))?;
    let parsed: CatalogFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))?;

    let catalog = merge_over_builtin(parsed);
    validate_catalog(&catalog)?;

    tracing::info!(
        path = %path.display(),
        circuits = catalog.circuits.len(),
        compounds = catalog.compounds.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Parse catalog JSON text (same layering and validation as files).
pub fn parse_catalog_json(text: &str) -> Result<StrategyCatalog, AppError> {
    let parsed: CatalogFile =
        serde_json::from_str(text).map_err(|e| AppError::new(2, format!("Invalid config: {e}")))?;
    let catalog = merge_over_builtin(parsed);
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn merge_over_builtin(file: CatalogFile) -> StrategyCatalog {
    let mut catalog = StrategyCatalog::builtin();
    catalog.circuits.extend(file.circuits);
    catalog.compounds.extend(file.compounds);
    catalog
}

/// Check value ranges the degradation model relies on.
pub fn validate_catalog(catalog: &StrategyCatalog) -> Result<(), AppError> {
    for (id, c) in &catalog.circuits {
        if c.name.trim().is_empty() {
            return Err(AppError::new(2, format!("Circuit '{id}': name must not be empty.")));
        }
        if c.total_laps == 0 {
            return Err(AppError::new(2, format!("Circuit '{id}': total_laps must be positive.")));
        }
        if !(c.base_lap_time.is_finite() && c.base_lap_time > 0.0) {
            return Err(AppError::new(
                2,
                format!("Circuit '{id}': base_lap_time must be a positive number of seconds."),
            ));
        }
    }

    for (id, spec) in &catalog.compounds {
        if id.parse::<Compound>().is_err() {
            return Err(AppError::new(
                2,
                format!("Unknown compound id '{id}' in config (expected soft, medium or hard)."),
            ));
        }
        if !(spec.degradation_rate.is_finite() && spec.degradation_rate >= 0.0) {
            return Err(AppError::new(2, format!("Compound '{id}': degradation_rate must be >= 0.")));
        }
        if !(spec.over_limit_rate.is_finite() && spec.over_limit_rate >= 0.0) {
            return Err(AppError::new(2, format!("Compound '{id}': over_limit_rate must be >= 0.")));
        }
        if spec.wear_limit == 0 {
            return Err(AppError::new(2, format!("Compound '{id}': wear_limit must be positive.")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_builtin_catalog() {
        assert_eq!(parse_catalog_json("{}").unwrap(), StrategyCatalog::builtin());
    }

    #[test]
    fn file_entries_override_and_extend() {
        let catalog = parse_catalog_json(
            r#"{
                "circuits": { "spa": { "name": "Spa", "total_laps": 44, "base_lap_time": 106.0 } },
                "compounds": { "soft": { "degradation_rate": 0.5, "wear_limit": 10, "over_limit_rate": 1.0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.circuit("spa").unwrap().total_laps, 44);
        assert!(catalog.circuit("monaco").is_ok());
        assert_eq!(catalog.compound(Compound::Soft).unwrap().wear_limit, 10);
        assert_eq!(catalog.compound(Compound::Hard).unwrap().wear_limit, 35);
    }

    #[test]
    fn rejects_unknown_compound_ids() {
        let err = parse_catalog_json(
            r#"{ "compounds": { "intermediate": { "degradation_rate": 0.1, "wear_limit": 5, "over_limit_rate": 0.1 } } }"#,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("intermediate"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = parse_catalog_json(
            r#"{ "circuits": { "x": { "name": "X", "total_laps": 0, "base_lap_time": 80.0 } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("total_laps"));

        let err = parse_catalog_json(
            r#"{ "compounds": { "hard": { "degradation_rate": -0.1, "wear_limit": 5, "over_limit_rate": 0.1 } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("degradation_rate"));
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        assert!(parse_catalog_json(r#"{ "tracks": {} }"#).is_err());
    }

    #[test]
    fn reads_config_file() {
        let path = std::env::temp_dir().join(format!("strat_config_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "circuits": { "spa": { "name": "Spa", "total_laps": 44, "base_lap_time": 106.0 } } }"#,
        )
        .unwrap();
        let catalog = load_catalog(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(catalog.circuit_ids(), vec!["monaco", "silverstone", "spa"]);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = read_catalog_json(Path::new("/nonexistent/strat.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
