//! Formatted terminal output: race summary, stint and lap tables, warnings.
//!
//! We keep formatting code in one place so:
//! - the simulation code stays clean and testable
//! - output changes are localized (golden tests below)

use crate::domain::{CircuitProfile, Compound, RaceDuration, RaceResult, Stint, StrategyCatalog};
use crate::sim::StrategyWarning;

/// Split a duration in seconds into whole hours, minutes and seconds.
///
/// Sub-second precision is truncated, not rounded. Negative or non-finite
/// input yields zero.
pub fn format_duration(total_seconds: f64) -> RaceDuration {
    let s = if total_seconds.is_finite() && total_seconds > 0.0 {
        total_seconds
    } else {
        0.0
    };
    RaceDuration {
        hours: (s / 3600.0).floor() as u64,
        minutes: ((s % 3600.0) / 60.0).floor() as u8,
        seconds: (s % 60.0).floor() as u8,
    }
}

/// Format the full run summary (circuit, strategy, stints, totals).
pub fn format_race_summary(circuit: &CircuitProfile, stints: &[Stint], result: &RaceResult) -> String {
    let mut out = String::new();

    out.push_str("=== strat - Race Strategy Estimate ===\n");
    out.push_str(&format!(
        "Circuit: {} ({} laps, base {:.3}s)\n",
        circuit.name, circuit.total_laps, circuit.base_lap_time
    ));
    out.push_str(&format!("Strategy: {}\n", fmt_strategy(stints)));

    out.push_str("\nStints:\n");
    out.push_str(&format_stint_table(result));

    out.push('\n');
    out.push_str(&format!(
        "Total race time: {} ({:.3}s over {} laps)\n",
        format_duration(result.total_time),
        result.total_time,
        result.lap_count()
    ));
    if let Some(lap) = result.fastest_lap() {
        out.push_str(&format!(
            "Fastest lap: {} ({:.3}s, {})\n",
            lap.lap,
            lap.lap_time,
            lap.compound.display_name()
        ));
    }
    if let Some(lap) = result.slowest_lap() {
        out.push_str(&format!(
            "Slowest lap: {} ({:.3}s, {})\n",
            lap.lap,
            lap.lap_time,
            lap.compound.display_name()
        ));
    }

    out
}

/// Per-stint table: laps run, total and mean lap time, final lap time.
pub fn format_stint_table(result: &RaceResult) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<3} {:<8} {:>9} {:>5} {:>11} {:>9} {:>9}",
            "#", "compound", "laps", "n", "total", "mean", "final"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<3} {:-<8} {:-<9} {:-<5} {:-<11} {:-<9} {:-<9}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in result.stint_summaries() {
        out.push_str(
            format!(
                "{:<3} {:<8} {:>9} {:>5} {:>11.3} {:>9.3} {:>9.3}",
                s.stint + 1,
                s.compound.id(),
                format!("{}-{}", s.first_lap, s.last_lap),
                s.lap_count,
                s.total_time,
                s.mean_lap_time(),
                s.final_lap_time,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Per-lap table in simulation order.
pub fn format_lap_table(result: &RaceResult) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>5} {:>5} {:<8} {:>5} {:>10}", "lap", "stint", "compound", "age", "lap_time").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<5} {:-<5} {:-<8} {:-<5} {:-<10}", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in &result.laps {
        out.push_str(
            format!(
                "{:>5} {:>5} {:<8} {:>5} {:>10.2}",
                r.lap,
                r.stint + 1,
                r.compound.id(),
                r.laps_on_tire,
                r.lap_time
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Strategy warnings as a bulleted list (empty string when there are none).
pub fn format_warnings(warnings: &[StrategyWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = String::from("Warnings:\n");
    for w in warnings {
        out.push_str(&format!("- {w}\n"));
    }
    out
}

/// Circuit and compound tables of a catalog.
pub fn format_catalog(catalog: &StrategyCatalog) -> String {
    let mut out = String::new();

    out.push_str("Circuits:\n");
    out.push_str(format!("{:<14} {:<16} {:>5} {:>9}", "id", "name", "laps", "base").trim_end());
    out.push('\n');
    for (id, c) in &catalog.circuits {
        out.push_str(
            format!(
                "{:<14} {:<16} {:>5} {:>9.3}",
                id,
                c.name,
                c.total_laps,
                c.base_lap_time
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str("\nCompounds:\n");
    out.push_str(format!("{:<8} {:>9} {:>6} {:>10}", "id", "rate", "limit", "over_rate").trim_end());
    out.push('\n');
    for compound in Compound::ALL {
        let Some(spec) = catalog.compounds.get(compound.id()) else {
            continue;
        };
        out.push_str(
            format!(
                "{:<8} {:>9.3} {:>6} {:>10.3}",
                compound.id(),
                spec.degradation_rate,
                spec.wear_limit,
                spec.over_limit_rate
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_strategy(stints: &[Stint]) -> String {
    if stints.is_empty() {
        return "(no stints)".to_string();
    }
    let parts: Vec<String> = stints.iter().map(Stint::to_string).collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::simulate;

    fn two_stint_run() -> (CircuitProfile, Vec<Stint>, RaceResult) {
        let catalog = StrategyCatalog::builtin();
        let circuit = CircuitProfile {
            name: "Test".to_string(),
            total_laps: 4,
            base_lap_time: 90.0,
        };
        let stints = vec![Stint::new(1, 2, Compound::Medium), Stint::new(3, 4, Compound::Hard)];
        let result = simulate(&circuit, &catalog.compounds, &stints).unwrap();
        (circuit, stints, result)
    }

    #[test]
    fn duration_examples() {
        assert_eq!(
            format_duration(3661.0),
            RaceDuration {
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(
            format_duration(59.0),
            RaceDuration {
                hours: 0,
                minutes: 0,
                seconds: 59
            }
        );
    }

    #[test]
    fn duration_truncates_fractions() {
        let d = format_duration(7199.99);
        assert_eq!((d.hours, d.minutes, d.seconds), (1, 59, 59));
    }

    #[test]
    fn duration_clamps_invalid_input() {
        assert_eq!(format_duration(-5.0), format_duration(0.0));
        assert_eq!(format_duration(f64::NAN), format_duration(0.0));
    }

    #[test]
    fn lap_table_golden() {
        let (_, _, result) = two_stint_run();
        let expected = concat!(
            "  lap stint compound   age   lap_time\n",
            "----- ----- -------- ----- ----------\n",
            "    1     1 medium       1      90.20\n",
            "    2     1 medium       2      90.40\n",
            "    3     2 hard         1      90.10\n",
            "    4     2 hard         2      90.20\n",
        );
        assert_eq!(format_lap_table(&result), expected);
    }

    #[test]
    fn summary_mentions_totals_and_extremes() {
        let (circuit, stints, result) = two_stint_run();
        let txt = format_race_summary(&circuit, &stints, &result);
        assert!(txt.contains("Circuit: Test (4 laps, base 90.000s)"));
        assert!(txt.contains("Strategy: 1-2:medium, 3-4:hard"));
        assert!(txt.contains("Total race time: 0h 06m 00s (360.900s over 4 laps)"));
        assert!(txt.contains("Fastest lap: 3 (90.100s, Hard)"));
        assert!(txt.contains("Slowest lap: 2 (90.400s, Medium)"));
    }

    #[test]
    fn stint_table_rows() {
        let (_, _, result) = two_stint_run();
        let txt = format_stint_table(&result);
        let rows: Vec<&str> = txt.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("1   medium"));
        assert!(rows[1].contains("3-4"));
    }

    #[test]
    fn catalog_listing_golden() {
        let expected = concat!(
            "Circuits:\n",
            "id             name              laps      base\n",
            "monaco         Monaco              78    75.000\n",
            "silverstone    Silverstone         52    90.000\n",
            "\n",
            "Compounds:\n",
            "id            rate  limit  over_rate\n",
            "soft         0.300     22      0.800\n",
            "medium       0.200     30      0.800\n",
            "hard         0.100     35      0.800\n",
        );
        assert_eq!(format_catalog(&StrategyCatalog::builtin()), expected);
    }

    #[test]
    fn warnings_are_listed() {
        assert_eq!(format_warnings(&[]), "");
        let txt = format_warnings(&[StrategyWarning::Gap { from: 3, to: 4 }]);
        assert_eq!(txt, "Warnings:\n- laps 3-4 are not covered by any stint\n");
    }
}
