//! Config command implementation.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::config::ObligoConfig;
use crate::output::{print_header, print_json, print_output, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the configuration in effect
    Show,

    /// Show which configuration file is in use
    Path,
}

/// Execute the config command.
pub fn execute(
    args: ConfigArgs,
    config: &ObligoConfig,
    source: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(config, format),
        ConfigCommand::Path => execute_path(source),
    }
}

fn execute_show(config: &ObligoConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let engine = &config.engine;
            let rows = vec![
                KeyValue::new("storage_path", config.storage_path.clone()),
                KeyValue::new(
                    "positions_file",
                    config.positions_file.clone().unwrap_or_else(|| "-".into()),
                ),
                KeyValue::new("engine.tax_rate", engine.tax_rate.to_string()),
                KeyValue::new("engine.fallback_months", engine.fallback_months.to_string()),
                KeyValue::new("engine.retry.max_attempts", engine.retry.max_attempts.to_string()),
                KeyValue::new("engine.retry.delay_ms", engine.retry.delay_ms.to_string()),
                KeyValue::new("source.base_url", config.source.base_url.clone()),
                KeyValue::new("source.timeout_secs", config.source.timeout_secs.to_string()),
                KeyValue::new("source.pause_ms", config.source.pause_ms.to_string()),
            ];
            print_header("Current Configuration");
            print_output(&rows, format)
        }
        OutputFormat::Json => print_json(config),
        OutputFormat::Minimal => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn execute_path(source: Option<&Path>) -> Result<()> {
    match source {
        Some(path) => println!("{}", path.display()),
        None => println!("(built-in defaults)"),
    }
    Ok(())
}
