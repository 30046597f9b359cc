//! Rates command implementation.
//!
//! Reads, lists and seeds the monthly index rate cache.

use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use obligo_bonds::indices::LookupPolicy;
use obligo_traits::storage::{IndexRate, RateCacheStore};

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::{build_resolver, open_rate_cache, parse_period};
use crate::config::ObligoConfig;
use crate::error::CliError;
use crate::output::{print_header, print_info, print_json, print_output, print_success, KeyValue};

/// Arguments for the rates command.
#[derive(Args, Debug)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

/// Rates subcommands.
#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Resolve the index rate of one month
    Get(GetArgs),

    /// List cached index rates
    List,

    /// Seed the cache with a known rate (kept only if the month is not cached)
    Put(PutArgs),
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Year
    pub year: i32,

    /// Month (1-12)
    pub month: u32,

    /// Step back to the latest published month if this one is not out yet
    #[arg(long)]
    pub latest: bool,
}

/// Arguments for put subcommand.
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Year
    pub year: i32,

    /// Month (1-12)
    pub month: u32,

    /// Rate as a decimal fraction (e.g. 0.0280 for 2.8%)
    pub rate: String,

    /// Source attribution
    #[arg(long, default_value = "manual")]
    pub source: String,
}

/// One cached rate for display.
#[derive(Debug, Serialize, Tabled)]
pub struct RateRow {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Percent")]
    pub percent: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<&IndexRate> for RateRow {
    fn from(rate: &IndexRate) -> Self {
        Self {
            period: rate.period.to_string(),
            rate: rate.value.to_string(),
            percent: format!("{}%", rate.value_percent().round_dp(2)),
            source: rate.source.clone().unwrap_or_default(),
        }
    }
}

/// Execute the rates command.
pub fn execute(args: RatesArgs, config: &ObligoConfig, opts: GlobalOptions) -> Result<()> {
    match args.command {
        RatesCommand::Get(get_args) => execute_get(get_args, config, opts),
        RatesCommand::List => execute_list(config, opts.format),
        RatesCommand::Put(put_args) => execute_put(put_args, config, opts.format),
    }
}

fn execute_get(args: GetArgs, config: &ObligoConfig, opts: GlobalOptions) -> Result<()> {
    let period = parse_period(args.year, args.month)?;
    let resolver = build_resolver(config, opts.offline)?;
    let policy = if args.latest {
        LookupPolicy::LatestPublished {
            max_steps: config.engine.fallback_months,
        }
    } else {
        LookupPolicy::Exact
    };

    let resolved = resolver.resolve_with(period, policy, &config.engine.retry)?;

    match opts.format {
        OutputFormat::Table => {
            print_header("Index Rate");
            let rows = vec![
                KeyValue::new("Requested", resolved.requested.to_string()),
                KeyValue::new("Period", resolved.period.to_string()),
                KeyValue::new("Rate", resolved.value.to_string()),
                KeyValue::new(
                    "Percent",
                    format!("{}%", (resolved.value * Decimal::ONE_HUNDRED).round_dp(2)),
                ),
            ];
            print_output(&rows, opts.format)?;
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "requested": resolved.requested,
                "period": resolved.period,
                "rate": resolved.value.to_string(),
            });
            print_json(&output)?;
        }
        OutputFormat::Minimal => println!("{}", resolved.value),
    }
    Ok(())
}

fn execute_list(config: &ObligoConfig, format: OutputFormat) -> Result<()> {
    let cache = open_rate_cache(config)?;
    let rates = cache.list()?;
    let rows: Vec<RateRow> = rates.iter().map(RateRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_header("Cached Index Rates");
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_output(&rows, format)?,
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{} {}", row.period, row.rate);
            }
        }
    }
    Ok(())
}

fn execute_put(args: PutArgs, config: &ObligoConfig, format: OutputFormat) -> Result<()> {
    let period = parse_period(args.year, args.month)?;
    let value = Decimal::from_str(args.rate.trim())
        .map_err(|_| CliError::InvalidRate(args.rate.clone()))?;

    let cache = open_rate_cache(config)?;
    let rate = IndexRate::with_source(period, value, &args.source);
    let created = cache.insert_if_absent(&rate)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "period": period,
            "rate": value.to_string(),
            "created": created,
        }))?,
        OutputFormat::Minimal => println!("{created}"),
        OutputFormat::Table => {
            if created {
                print_success(&format!("Cached {period} = {value}"));
            } else {
                print_info(&format!("{period} is already cached; existing value kept"));
            }
        }
    }
    Ok(())
}
