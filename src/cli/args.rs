//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Pull BLS QCEW statewide sector employment into a monthly fact table
#[derive(Parser)]
#[command(name = "qcew-etl")]
#[command(about = "qcew-etl - Download, cache and reshape QCEW statewide sector employment", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download (or reuse cached) slices and write the fact table
    #[command(name = "run")]
    Run {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output CSV path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Report which slices of the selection are already cached
    #[command(name = "status")]
    Status {
        #[command(flatten)]
        selection: SelectionArgs,

        /// List every missing slice
        #[arg(long)]
        missing: bool,
    },
}

/// Task selection shared by every command; each flag overrides the
/// configuration file, which overrides the built-in defaults
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// First year to pull
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year to pull (inclusive)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Quarters to pull, e.g. 1,2,3,4
    #[arg(long, value_delimiter = ',')]
    pub quarters: Vec<u8>,

    /// State abbreviations to pull, e.g. AL,AK
    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,

    /// Slice cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}
