//! Obligo CLI - value retail treasury bonds from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Value a purchase given inline
//! obligo value COI0128 --bought 2024-01-01 --price 1000 --amount 10 \
//!     --coupon-rate 0.05 --first-year 0.03 --date 2024-07-19
//!
//! # Value one position, or all of them, from the portfolio file
//! obligo value EDO0434 --positions portfolio.json
//! obligo value --all --positions portfolio.json --format json
//!
//! # Inspect and seed the index rate cache
//! obligo rates get 2024 10
//! obligo rates put 2024 10 0.0500
//! obligo rates list
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands, GlobalOptions};
use config::ObligoConfig;

const DEFAULT_LOG_FILTER: &str = "warn,obligo_bonds=info,obligo_ext_gus=info,obligo_ext_redb=info";

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let (config, config_path) = ObligoConfig::load(cli.config.as_deref())?;
    let opts = GlobalOptions {
        format: cli.format,
        offline: cli.offline,
    };

    // Execute command
    match cli.command {
        Commands::Value(args) => commands::value::execute(args, &config, opts)?,
        Commands::Rates(args) => commands::rates::execute(args, &config, opts)?,
        Commands::Config(args) => {
            commands::config::execute(args, &config, config_path.as_deref(), opts.format)?;
        }
    }

    Ok(())
}
