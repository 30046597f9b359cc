//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{ConfigArgs, RatesArgs, ValueArgs};

/// Obligo - retail treasury bond valuation
#[derive(Parser)]
#[command(name = "obligo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (TOML)
    #[arg(short, long, env = "OBLIGO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Use cached index rates only, never query the statistics office
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Value one bond position or the whole portfolio
    Value(ValueArgs),

    /// Inspect and seed the index rate cache
    Rates(RatesArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Minimal output (just the value)
    Minimal,
}

/// Options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    /// Output format
    pub format: OutputFormat,
    /// Skip the remote index source
    pub offline: bool,
}
