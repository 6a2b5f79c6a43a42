//! Command-line parsing for the race strategy estimator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! simulation code. Stint arguments use the form `START-END:COMPOUND`, e.g.
//! `1-20:medium`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Compound, Stint};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "strat", version, about = "Race tire strategy estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate a stint plan, print the race estimate, and optionally plot/export.
    Simulate(SimulateArgs),
    /// List the circuits and compounds available in the catalog.
    Circuits(CatalogArgs),
    /// Plot a previously exported race JSON.
    Plot(PlotArgs),
    /// Launch the interactive strategy editor.
    ///
    /// Stint rows are edited in place and the race is re-simulated on every
    /// change, with the lap-time chart rendered using Ratatui.
    Tui(TuiArgs),
}

/// Catalog selection shared by all commands that simulate.
#[derive(Debug, Parser, Clone)]
pub struct CatalogArgs {
    /// Catalog JSON layered over the built-in circuits/compounds
    /// (defaults to $STRAT_CONFIG when set).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Circuit id (see `strat circuits`).
    #[arg(short = 'c', long, default_value = "silverstone")]
    pub circuit: String,

    /// Stint as START-END:COMPOUND (repeat in race order), e.g. `-s 1-20:medium -s 21-52:hard`.
    #[arg(short = 's', long = "stint", value_name = "START-END:COMPOUND", required = true)]
    pub stints: Vec<String>,

    /// Print the per-lap table.
    #[arg(long)]
    pub laps: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Fail when the stints leave gaps, overlap, or run outside the race distance.
    #[arg(long)]
    pub strict: bool,

    /// Export per-lap results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full race (circuit, stints, laps, total) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Options for plotting a saved race.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Race JSON file produced by `strat simulate --export-json`.
    #[arg(long, value_name = "JSON")]
    pub race: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Circuit to start with (defaults to the first catalog entry).
    #[arg(short = 'c', long)]
    pub circuit: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Parse a `START-END:COMPOUND` stint argument.
///
/// Laps are numbered from 1. A reversed range is accepted and runs no laps;
/// an unknown compound name is a strategy error, anything else is a usage error.
pub fn parse_stint(arg: &str) -> Result<Stint, AppError> {
    let usage = || AppError::new(2, format!("Invalid stint '{arg}': expected START-END:COMPOUND, e.g. 1-20:medium."));

    let (range, compound) = arg.split_once(':').ok_or_else(usage)?;
    let (start, end) = range.split_once('-').ok_or_else(usage)?;
    let start_lap: u32 = start.trim().parse().map_err(|_| usage())?;
    let end_lap: u32 = end.trim().parse().map_err(|_| usage())?;
    if start_lap == 0 {
        return Err(AppError::new(2, format!("Invalid stint '{arg}': laps are numbered from 1.")));
    }
    let compound: Compound = compound.parse()?;

    Ok(Stint::new(start_lap, end_lap, compound))
}
