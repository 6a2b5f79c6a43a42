//! Strategy aggregation: stints in, lap time series and race total out.
//!
//! Stints are processed in the order given by the caller. Each stint starts on
//! a fresh set of tires, so the wear counter restarts at every stint boundary
//! even when the compound repeats.
//!
//! Stint ranges are not validated here. Reversed ranges produce no laps, and
//! overlapping or gapped stints are simulated literally. See `sim::checks`
//! for advisory diagnostics.

use crate::domain::{
    CircuitProfile, CompoundSpec, CompoundTable, LapRecord, RaceResult, Stint, StrategyCatalog, lookup_compound,
};
use crate::error::StrategyError;
use crate::models::lap_time;

/// Simulate a strategy on a circuit.
///
/// Every stint's compound is resolved before any lap is computed; an unknown
/// compound fails the whole calculation.
pub fn simulate(
    circuit: &CircuitProfile,
    compounds: &CompoundTable,
    stints: &[Stint],
) -> Result<RaceResult, StrategyError> {
    let specs: Vec<&CompoundSpec> = stints
        .iter()
        .map(|s| lookup_compound(compounds, s.compound))
        .collect::<Result<_, _>>()?;

    let mut laps = Vec::new();
    let mut total_time = 0.0;

    for (idx, (stint, spec)) in stints.iter().zip(specs).enumerate() {
        let mut laps_on_tire = 0u32;
        for lap in stint.start_lap..=stint.end_lap {
            laps_on_tire = laps_on_tire.saturating_add(1);
            let t = lap_time(circuit.base_lap_time, spec, laps_on_tire);
            laps.push(LapRecord {
                lap,
                lap_time: t,
                compound: stint.compound,
                stint: idx,
                laps_on_tire,
            });
            total_time += t;
        }
    }

    tracing::debug!(
        circuit = %circuit.name,
        stints = stints.len(),
        laps = laps.len(),
        total_time,
        "simulated strategy"
    );

    Ok(RaceResult { laps, total_time })
}

/// Resolve `circuit_id` in the catalog and simulate against its compound table.
pub fn simulate_circuit(
    catalog: &StrategyCatalog,
    circuit_id: &str,
    stints: &[Stint],
) -> Result<RaceResult, StrategyError> {
    let circuit = catalog.circuit(circuit_id)?;
    simulate(circuit, &catalog.compounds, stints)
}
