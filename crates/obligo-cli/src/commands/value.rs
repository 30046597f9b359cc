//! Value command implementation.
//!
//! Values one bond position, given inline or looked up in the portfolio file,
//! or every position of the portfolio.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use obligo_bonds::{ValuationDate, ValuationResult, Valuator};
use obligo_core::types::parse_datetime;
use obligo_ext_file::JsonPositionSource;
use obligo_traits::ids::InstrumentId;
use obligo_traits::reference_data::{BondPosition, PositionSource};

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::build_resolver;
use crate::config::ObligoConfig;
use crate::error::CliError;
use crate::output::{format_amount, print_error, print_header, print_json, print_output, KeyValue};

/// Arguments for the value command.
#[derive(Args, Debug)]
pub struct ValueArgs {
    /// Instrument identifier (e.g. COI0428)
    #[arg(required_unless_present = "all")]
    pub identifier: Option<String>,

    /// Value every position of the portfolio
    #[arg(long, conflicts_with = "identifier")]
    pub all: bool,

    /// Valuation date ('today' or a date such as 2024-07-19)
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Portfolio file (JSON); overrides `positions_file` from the config
    #[arg(short, long)]
    pub positions: Option<String>,

    /// Purchase date, to pick one of several purchases or to value inline
    #[arg(long)]
    pub bought: Option<String>,

    /// Principal paid (inline valuation)
    #[arg(long, requires = "bought")]
    pub price: Option<f64>,

    /// Units bought (inline valuation)
    #[arg(long, default_value = "1")]
    pub amount: f64,

    /// Fixed annual margin as a decimal fraction (inline valuation)
    #[arg(long, requires = "price")]
    pub coupon_rate: Option<f64>,

    /// First-year rate as a decimal fraction (inline valuation)
    #[arg(long, requires = "price")]
    pub first_year: Option<f64>,
}

/// One valued position for display.
#[derive(Debug, Serialize, Tabled)]
pub struct ValuationRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "Family")]
    pub family: String,
    #[tabled(rename = "Valued at")]
    pub effective: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit value")]
    pub unit_value: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Execute the value command.
pub fn execute(args: ValueArgs, config: &ObligoConfig, opts: GlobalOptions) -> Result<()> {
    let date: ValuationDate = args
        .date
        .parse()
        .map_err(|_| CliError::InvalidDate(args.date.clone()))?;
    let valuator = Valuator::new(build_resolver(config, opts.offline)?, config.engine.clone());

    if args.all {
        let positions = load_positions(&args, config)?.list()?;
        return value_portfolio(&valuator, &positions, date, opts.format);
    }

    let identifier = args
        .identifier
        .clone()
        .ok_or_else(|| CliError::MissingArgument("identifier".into()))?;
    let position = match args.price {
        Some(price) => inline_position(&args, &identifier, price)?,
        None => find_position(&args, config, &identifier)?,
    };

    let result = valuator.value(&position, date)?;
    print_result(&result, opts.format)
}

fn inline_position(args: &ValueArgs, identifier: &str, price: f64) -> Result<BondPosition> {
    let bought = args
        .bought
        .as_deref()
        .ok_or_else(|| CliError::MissingArgument("--bought".into()))?;
    let acquired_at = parse_datetime(bought).map_err(|_| CliError::InvalidDate(bought.into()))?;

    let mut position = BondPosition::new(identifier, acquired_at, price, args.amount);
    position.coupon_rate = args.coupon_rate;
    position.inflation_first_year = args.first_year;
    Ok(position)
}

fn load_positions(args: &ValueArgs, config: &ObligoConfig) -> Result<JsonPositionSource> {
    let path = args
        .positions
        .as_deref()
        .or(config.positions_file.as_deref())
        .ok_or_else(|| CliError::MissingArgument("--positions (or positions_file in config)".into()))?;
    Ok(JsonPositionSource::new(path)?)
}

fn find_position(args: &ValueArgs, config: &ObligoConfig, identifier: &str) -> Result<BondPosition> {
    let source = load_positions(args, config)?;
    let acquired_on = match args.bought.as_deref() {
        Some(s) => Some(
            parse_datetime(s)
                .map_err(|_| CliError::InvalidDate(s.into()))?
                .date(),
        ),
        None => None,
    };
    source
        .find(&InstrumentId::new(identifier), acquired_on)?
        .ok_or_else(|| CliError::PositionNotFound(identifier.to_string()).into())
}

fn print_result(result: &ValuationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_header(&format!("Valuation of {}", result.identifier));
            let rows = vec![
                KeyValue::new("Family", result.family.to_string()),
                KeyValue::new("Requested", result.requested.to_string()),
                KeyValue::new("Valued at", result.effective.to_string()),
                KeyValue::new("Matured", result.matured.to_string()),
                KeyValue::new("Periods", result.periods.to_string()),
                KeyValue::new("Value", format_amount(result.value)),
                KeyValue::new("Unit value", format_amount(result.unit_value)),
                KeyValue::new("Currency", result.currency.to_string()),
            ];
            print_output(&rows, format)
        }
        OutputFormat::Json => print_json(result),
        OutputFormat::Minimal => {
            println!("{}", format_amount(result.value));
            Ok(())
        }
    }
}

fn value_portfolio(
    valuator: &Valuator,
    positions: &[BondPosition],
    date: ValuationDate,
    format: OutputFormat,
) -> Result<()> {
    let valuations = valuator.value_all(positions, date);

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = valuations
                .iter()
                .map(|v| match &v.result {
                    Ok(result) => serde_json::json!({ "id": v.id, "result": result }),
                    Err(e) => serde_json::json!({
                        "id": v.id,
                        "identifier": v.identifier,
                        "error": e.to_string(),
                    }),
                })
                .collect();
            print_json(&output)
        }
        OutputFormat::Minimal => {
            let mut total = 0.0;
            for v in &valuations {
                match &v.result {
                    Ok(result) => total += result.value,
                    Err(e) => print_error(&format!("{}: {e}", v.identifier)),
                }
            }
            println!("{}", format_amount(total));
            Ok(())
        }
        OutputFormat::Table => {
            let rows: Vec<ValuationRow> = valuations
                .iter()
                .map(|v| {
                    let id = v.id.map(|id| id.to_string()).unwrap_or_default();
                    match &v.result {
                        Ok(r) => ValuationRow {
                            id,
                            identifier: v.identifier.to_string(),
                            family: r.family.to_string(),
                            effective: r.effective.date().to_string(),
                            value: format_amount(r.value),
                            unit_value: format_amount(r.unit_value),
                            status: if r.matured { "matured" } else { "ok" }.to_string(),
                        },
                        Err(e) => {
                            print_error(&format!("{}: {e}", v.identifier));
                            ValuationRow {
                                id,
                                identifier: v.identifier.to_string(),
                                family: String::new(),
                                effective: String::new(),
                                value: String::new(),
                                unit_value: String::new(),
                                status: "failed".to_string(),
                            }
                        }
                    }
                })
                .collect();
            print_header("Portfolio Valuation");
            print_output(&rows, format)
        }
    }
}
