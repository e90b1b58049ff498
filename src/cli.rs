use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Gridded drought indices from reanalysis fields.
#[derive(Parser)]
#[command(
    name = "drought",
    version,
    about = "Drought indices from a trailing year of daily reanalysis fields"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Assemble the inputs, compute every index and write one file per interval.
    Process(ProcessArgs),
}

/// Arguments for the `process` subcommand.
#[derive(clap::Args)]
pub struct ProcessArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "drought.toml")]
    pub config: PathBuf,

    /// Override the analysis date (YYYY-MM-DD).
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
