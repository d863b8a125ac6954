// salesflow/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use salesflow_core::domain::training::FeatureMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salesflow")]
#[command(about = "Sales CSV preprocessing and demand model training", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory; every relative path of the config resolves against it
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧹 Reshapes the latest raw sales CSV into a wide per-model table
    Preprocess {
        /// Raw CSV to use instead of the latest one in the raw directory
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output file (default: <processed-dir>/sales_processed_<YYYYMMDD_HHMM>.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// 🧠 Trains the sales regressor on the latest processed CSV
    Train {
        /// Directory holding sales_processed_*.csv files
        #[arg(long)]
        processed_dir: Option<PathBuf>,

        /// How the target is derived: first column, or sum of all columns
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// 🔎 Runs data-quality checks on one stage's artifact
    Check {
        #[arg(value_enum)]
        target: CheckTarget,

        /// File to check instead of the latest one (raw and processed only)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
}

impl Commands {
    /// Each job appends to its own log file.
    pub fn log_file_name(&self) -> &'static str {
        match self {
            Commands::Preprocess { .. } => "preprocessed.logs",
            Commands::Train { .. } => "train.logs",
            Commands::Check { .. } => "check.logs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    First,
    All,
}

impl From<ModeArg> for FeatureMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::First => FeatureMode::First,
            ModeArg::All => FeatureMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckTarget {
    Raw,
    Processed,
    Model,
}
