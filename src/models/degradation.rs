//! Tire degradation model.
//!
//! The simulator relies on two primitive operations:
//! - the wear penalty for a given tire age (`lap_penalty`)
//! - the resulting lap time on a circuit (`lap_time`)
//!
//! Wear is piecewise linear in the laps run on the current set:
//!
//! `penalty(n) = rate * n + over_rate * max(0, n - limit)`
//!
//! The curve is continuous at `n = limit` and has no ceiling.

use crate::domain::CompoundSpec;

/// Seconds added to the base lap time after `laps_on_tire` laps on this set.
///
/// `laps_on_tire` counts the current lap, so the first lap of a stint uses 1.
pub fn lap_penalty(spec: &CompoundSpec, laps_on_tire: u32) -> f64 {
    let mut penalty = spec.degradation_rate * laps_on_tire as f64;
    if laps_on_tire > spec.wear_limit {
        penalty += spec.over_limit_rate * (laps_on_tire - spec.wear_limit) as f64;
    }
    penalty
}

/// Predicted lap time for a tire of the given age.
pub fn lap_time(base_lap_time: f64, spec: &CompoundSpec, laps_on_tire: u32) -> f64 {
    base_lap_time + lap_penalty(spec, laps_on_tire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    use crate::domain::{Compound, StrategyCatalog};

    #[test]
    fn penalty_is_linear_before_the_limit() {
        let catalog = StrategyCatalog::builtin();
        let soft = catalog.compound(Compound::Soft).unwrap();
        assert_approx_eq!(lap_penalty(soft, 1), 0.3, 1e-12);
        assert_approx_eq!(lap_penalty(soft, 22), 6.6, 1e-12);
    }

    #[test]
    fn boundary_lap_adds_both_rates() {
        let catalog = StrategyCatalog::builtin();
        for c in Compound::ALL {
            let spec = catalog.compound(c).unwrap();
            let at_limit = lap_penalty(spec, spec.wear_limit);
            let after = lap_penalty(spec, spec.wear_limit + 1);
            assert_approx_eq!(after - at_limit, spec.degradation_rate + spec.over_limit_rate, 1e-9);
        }
    }

    #[test]
    fn penalty_is_monotone_non_decreasing() {
        let catalog = StrategyCatalog::builtin();
        for c in Compound::ALL {
            let spec = catalog.compound(c).unwrap();
            let mut prev = lap_penalty(spec, 1);
            for n in 2..=120 {
                let cur = lap_penalty(spec, n);
                assert!(cur >= prev, "{c} penalty dropped at lap {n}");
                prev = cur;
            }
        }
    }

    #[test]
    fn zero_rates_leave_base_time_unchanged() {
        let spec = CompoundSpec {
            degradation_rate: 0.0,
            wear_limit: 1,
            over_limit_rate: 0.0,
        };
        assert_eq!(lap_time(80.0, &spec, 50), 80.0);
    }

    #[test]
    fn lap_time_adds_penalty_to_base() {
        let spec = CompoundSpec {
            degradation_rate: 0.5,
            wear_limit: 2,
            over_limit_rate: 1.0,
        };
        // 0.5 * 4 + 1.0 * 2
        assert_approx_eq!(lap_time(90.0, &spec, 4), 94.0, 1e-12);
    }
}
