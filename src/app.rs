//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - loads the circuit/compound catalog
//! - runs the strategy simulation
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{CatalogArgs, Command, PlotArgs, SimulateArgs, TuiArgs};
use crate::domain::{CircuitProfile, Stint};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the log filter (falls back to `RUST_LOG`).
pub const LOG_ENV: &str = "STRAT_LOG";

/// Entry point for the `strat` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // We want `strat` and `strat -c monaco` to behave like `strat tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Circuits(args) => handle_circuits(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let catalog = crate::io::config::load_catalog(args.catalog.config.as_deref())?;
    let stints = args
        .stints
        .iter()
        .map(|s| crate::cli::parse_stint(s))
        .collect::<Result<Vec<Stint>, AppError>>()?;

    preflight(catalog.circuit(&args.circuit)?, &stints, args.strict)?;
    let run = pipeline::run_strategy(&catalog, &args.circuit, &stints)?;

    println!(
        "{}",
        crate::report::format_race_summary(&run.circuit, &run.stints, &run.result)
    );

    let warnings = crate::report::format_warnings(&run.warnings);
    if !warnings.is_empty() {
        println!("{warnings}");
    }

    if args.laps {
        println!("{}", crate::report::format_lap_table(&run.result));
    }

    if !args.no_plot {
        let plot = crate::plot::render_lap_chart(&run.result, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_laps_csv(path, &run.result)?;
    }
    if let Some(path) = &args.export_json {
        let race = crate::io::race::RaceFile::new(&run.circuit_id, &run.circuit, &run.stints, &run.result);
        crate::io::race::write_race_json(path, &race)?;
    }

    Ok(())
}

/// Reject command-line stints before anything is simulated.
///
/// Stints may not run past the race distance. With `strict`, any strategy
/// warning is fatal as well.
fn preflight(circuit: &CircuitProfile, stints: &[Stint], strict: bool) -> Result<(), AppError> {
    if let Some(s) = stints.iter().find(|s| s.end_lap > circuit.total_laps) {
        return Err(AppError::new(
            2,
            format!(
                "Stint '{s}' runs past the race distance ({} has {} laps).",
                circuit.name, circuit.total_laps
            ),
        ));
    }

    if strict {
        let warnings = crate::sim::check_strategy(circuit, stints);
        if !warnings.is_empty() {
            return Err(AppError::new(
                2,
                format!(
                    "Strategy rejected (--strict).\n{}",
                    crate::report::format_warnings(&warnings).trim_end()
                ),
            ));
        }
    }

    Ok(())
}

fn handle_circuits(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = crate::io::config::load_catalog(args.config.as_deref())?;
    print!("{}", crate::report::format_catalog(&catalog));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let race = crate::io::race::read_race_json(&args.race)?;

    println!(
        "{} ({}) | {} | total {}",
        race.circuit.name,
        race.circuit_id,
        race.generated_at.format("%Y-%m-%d %H:%M UTC"),
        crate::report::format_duration(race.result.total_time)
    );
    let plot = crate::plot::render_lap_chart(&race.result, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let catalog = crate::io::config::load_catalog(args.catalog.config.as_deref())?;
    crate::tui::run(catalog, args.circuit)
}

/// Rewrite argv so `strat` defaults to `strat tui`.
///
/// Rules:
/// - `strat`                      -> `strat tui`
/// - `strat -c monaco ...`        -> `strat tui -c monaco ...`
/// - `strat --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "simulate" | "circuits" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Compound, StrategyCatalog};

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(args(&["strat"])), args(&["strat", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["strat", "-c", "monaco"])),
            args(&["strat", "tui", "-c", "monaco"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let sim = args(&["strat", "simulate", "-s", "1-52:hard"]);
        assert_eq!(rewrite_args(sim.clone()), sim);
        assert_eq!(rewrite_args(args(&["strat", "--help"])), args(&["strat", "--help"]));
    }

    fn silverstone() -> CircuitProfile {
        StrategyCatalog::builtin().circuit("silverstone").unwrap().clone()
    }

    #[test]
    fn preflight_rejects_stints_past_the_flag() {
        let huge = [Stint::new(1, u32::MAX, Compound::Soft)];
        let err = preflight(&silverstone(), &huge, false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("52 laps"));
    }

    #[test]
    fn strict_mode_rejects_warnings_before_simulating() {
        let gapped = [Stint::new(1, 20, Compound::Medium), Stint::new(25, 52, Compound::Hard)];
        assert!(preflight(&silverstone(), &gapped, false).is_ok());

        let err = preflight(&silverstone(), &gapped, true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Strategy rejected (--strict).\nWarnings:\n- laps 21-24 are not covered by any stint"
        );
    }

    #[test]
    fn strict_mode_accepts_a_clean_plan() {
        let clean = [Stint::new(1, 20, Compound::Medium), Stint::new(21, 52, Compound::Hard)];
        assert!(preflight(&silverstone(), &clean, true).is_ok());
    }
}
