//! Shared "strategy pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! circuit lookup -> advisory checks -> simulation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{CircuitProfile, RaceResult, Stint, StrategyCatalog};
use crate::error::StrategyError;
use crate::sim::{StrategyWarning, check_strategy, simulate};

/// All computed outputs of a single strategy run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub circuit_id: String,
    pub circuit: CircuitProfile,
    pub stints: Vec<Stint>,
    pub result: RaceResult,
    pub warnings: Vec<StrategyWarning>,
}

/// Resolve the circuit, check the stints, and simulate.
pub fn run_strategy(
    catalog: &StrategyCatalog,
    circuit_id: &str,
    stints: &[Stint],
) -> Result<RunOutput, StrategyError> {
    let circuit = catalog.circuit(circuit_id)?;

    let warnings = check_strategy(circuit, stints);
    for w in &warnings {
        tracing::warn!(circuit = circuit_id, "{w}");
    }

    let result = simulate(circuit, &catalog.compounds, stints)?;

    Ok(RunOutput {
        circuit_id: circuit_id.to_string(),
        circuit: circuit.clone(),
        stints: stints.to_vec(),
        result,
        warnings,
    })
}
