//! The valuation entry point.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{debug, info};

use obligo_core::types::parse_datetime;
use obligo_core::{CoreError, Currency};
use obligo_traits::reference_data::BondPosition;
use obligo_traits::InstrumentId;

use crate::accrual::{AccrualPolicy, AccrualWalker, BondTerms};
use crate::classification::classify;
use crate::config::EngineConfig;
use crate::error::{BondError, BondResult};
use crate::indices::RateResolver;
use crate::types::BondFamily;

/// When to value a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationDate {
    /// Current local date-time, read at call time
    Today,
    /// A fixed instant
    At(NaiveDateTime),
}

impl ValuationDate {
    /// Resolves to a concrete instant.
    #[must_use]
    pub fn resolve(&self) -> NaiveDateTime {
        match self {
            ValuationDate::Today => Local::now().naive_local(),
            ValuationDate::At(dt) => *dt,
        }
    }
}

impl From<NaiveDate> for ValuationDate {
    fn from(date: NaiveDate) -> Self {
        ValuationDate::At(date.and_time(NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for ValuationDate {
    fn from(dt: NaiveDateTime) -> Self {
        ValuationDate::At(dt)
    }
}

impl FromStr for ValuationDate {
    type Err = CoreError;

    /// Accepts `today` or any format understood by [`parse_datetime`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("today") {
            Ok(ValuationDate::Today)
        } else {
            parse_datetime(s).map(ValuationDate::At)
        }
    }
}

impl fmt::Display for ValuationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuationDate::Today => write!(f, "today"),
            ValuationDate::At(dt) => write!(f, "{dt}"),
        }
    }
}

/// Value of one position at one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    /// Instrument identifier
    pub identifier: InstrumentId,
    /// Bond family
    pub family: BondFamily,
    /// Valuation instant asked for
    pub requested: NaiveDateTime,
    /// Valuation instant after clipping to maturity
    pub effective: NaiveDateTime,
    /// Whether the requested instant is at or past maturity
    pub matured: bool,
    /// Number of accrual periods walked
    pub periods: usize,
    /// Net present value of the position
    pub value: f64,
    /// Value per unit held
    pub unit_value: f64,
    /// Currency tag of the position
    pub currency: Currency,
}

/// Outcome of one position in a portfolio run.
#[derive(Debug, Clone)]
pub struct PositionValuation {
    /// Record id of the position, if any
    pub id: Option<u64>,
    /// Instrument identifier
    pub identifier: InstrumentId,
    /// Valuation or the reason it failed
    pub result: BondResult<ValuationResult>,
}

/// Values bond positions.
///
/// Validation runs before any rate is resolved, so an invalid position never
/// touches the rate cache or the remote source.
#[derive(Debug, Clone)]
pub struct Valuator {
    walker: AccrualWalker,
    config: EngineConfig,
}

impl Valuator {
    /// Creates a valuator.
    pub fn new(resolver: RateResolver, config: EngineConfig) -> Self {
        Self {
            walker: AccrualWalker::new(resolver, &config),
            config,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The rate resolver.
    pub fn resolver(&self) -> &RateResolver {
        self.walker.resolver()
    }

    /// Values a position at a date.
    pub fn value(&self, position: &BondPosition, date: ValuationDate) -> BondResult<ValuationResult> {
        self.value_at(position, date.resolve())
    }

    /// Values every position at one date. Failures are reported per position.
    pub fn value_all(&self, positions: &[BondPosition], date: ValuationDate) -> Vec<PositionValuation> {
        let requested = date.resolve();
        positions
            .iter()
            .map(|position| PositionValuation {
                id: position.id,
                identifier: position.identifier.clone(),
                result: self.value_at(position, requested),
            })
            .collect()
    }

    fn value_at(&self, position: &BondPosition, requested: NaiveDateTime) -> BondResult<ValuationResult> {
        let identifier = position.identifier.to_string();

        if !position.is_bond() {
            return Err(BondError::UnsupportedAssetType {
                identifier,
                asset_type: position.asset_type.clone(),
            });
        }
        validate_numbers(position)?;
        if requested.date() < position.acquired_at.date() {
            return Err(BondError::ValuationBeforeAcquisition {
                identifier,
                valuation_date: requested.date().to_string(),
                acquired_on: position.acquired_at.date().to_string(),
            });
        }

        let classification = classify(
            &position.asset_type,
            &position.identifier,
            position.coupon_rate,
            position.inflation_first_year,
        )?;
        let family = classification.family;
        let principal = position.transaction_price;

        let Some(policy) = AccrualPolicy::for_family(family) else {
            debug!(identifier = %identifier, "Not an indexed bond, passing price through");
            return self.finish(position, family, requested, requested, false, 0, principal);
        };

        let maturity = family.maturity(position.acquired_at)?;
        let (effective, matured) = match maturity {
            Some(maturity) if requested >= maturity => (maturity, true),
            _ => (requested, false),
        };

        let terms = BondTerms::new(
            policy,
            principal,
            classification.coupon_rate.unwrap_or_default(),
            classification.inflation_first_year.unwrap_or_default(),
        );
        let outcome = self
            .walker
            .walk(&terms, position.acquired_at, effective)
            .map_err(|source| BondError::RateUnavailable {
                identifier: identifier.clone(),
                source,
            })?;

        self.finish(
            position,
            family,
            requested,
            effective,
            matured,
            outcome.periods.len(),
            outcome.value,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        position: &BondPosition,
        family: BondFamily,
        requested: NaiveDateTime,
        effective: NaiveDateTime,
        matured: bool,
        periods: usize,
        value: f64,
    ) -> BondResult<ValuationResult> {
        if !value.is_finite() {
            return Err(BondError::NonFiniteResult {
                identifier: position.identifier.to_string(),
                value,
            });
        }

        info!(
            identifier = %position.identifier,
            family = %family,
            effective = %effective,
            matured,
            periods,
            value,
            "Valued position"
        );

        Ok(ValuationResult {
            identifier: position.identifier.clone(),
            family,
            requested,
            effective,
            matured,
            periods,
            value,
            unit_value: value / position.amount,
            currency: position.currency,
        })
    }
}

fn validate_numbers(position: &BondPosition) -> BondResult<()> {
    let id = position.identifier.as_str();
    if !position.transaction_price.is_finite() || position.transaction_price < 0.0 {
        return Err(BondError::invalid_position(
            id,
            format!("transaction price {} is not a non-negative number", position.transaction_price),
        ));
    }
    if !position.amount.is_finite() || position.amount <= 0.0 {
        return Err(BondError::invalid_position(
            id,
            format!("amount {} is not a positive number", position.amount),
        ));
    }
    for (field, rate) in [
        ("coupon_rate", position.coupon_rate),
        ("inflation_first_year", position.inflation_first_year),
    ] {
        if let Some(rate) = rate.filter(|r| !r.is_finite()) {
            return Err(BondError::invalid_position(id, format!("{field} {rate} is not finite")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{MemoryIndexSource, MemoryRateStore, RetryPolicy};
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn valuator() -> Valuator {
        let resolver = RateResolver::new(
            Arc::new(MemoryRateStore::new()),
            Arc::new(MemoryIndexSource::new()),
        );
        Valuator::new(
            resolver,
            EngineConfig::default().with_retry(RetryPolicy::no_delay(1)),
        )
    }

    #[test]
    fn test_valuation_date_parsing() {
        assert_eq!("today".parse::<ValuationDate>().unwrap(), ValuationDate::Today);
        assert_eq!(
            "2024-07-19".parse::<ValuationDate>().unwrap(),
            ValuationDate::At(at(2024, 7, 19))
        );
        assert!("19th of July".parse::<ValuationDate>().is_err());
    }

    #[test]
    fn test_rejects_non_bond() {
        let position = BondPosition::new("AAPL", at(2024, 1, 1), 100.0, 1.0).with_asset_type("stock");
        let err = valuator()
            .value(&position, ValuationDate::At(at(2024, 6, 1)))
            .unwrap_err();
        assert!(matches!(err, BondError::UnsupportedAssetType { .. }));
    }

    #[test]
    fn test_rejects_valuation_before_acquisition() {
        let position = BondPosition::new("TOS0327", at(2024, 3, 1), 100.0, 1.0).with_coupon_rate(0.0595);
        let err = valuator()
            .value(&position, ValuationDate::At(at(2024, 2, 29)))
            .unwrap_err();
        assert!(matches!(err, BondError::ValuationBeforeAcquisition { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_bad_amount() {
        let position = BondPosition::new("TOS0327", at(2024, 3, 1), 100.0, 0.0).with_coupon_rate(0.0595);
        let err = valuator()
            .value(&position, ValuationDate::At(at(2024, 4, 1)))
            .unwrap_err();
        assert!(matches!(err, BondError::InvalidPosition { .. }));
    }

    #[test]
    fn test_unknown_prefix_passes_price_through() {
        let position = BondPosition::new("DOS0226", at(2024, 2, 1), 1000.0, 10.0).with_coupon_rate(0.0675);
        let result = valuator()
            .value(&position, ValuationDate::At(at(2025, 2, 1)))
            .unwrap();
        assert_eq!(result.family, BondFamily::Other);
        assert_eq!(result.value, 1000.0);
        assert_eq!(result.unit_value, 100.0);
        assert_eq!(result.periods, 0);
    }

    #[test]
    fn test_portfolio_reports_each_position() {
        let positions = vec![
            BondPosition::new("OTS0125", at(2024, 10, 1), 100.0, 1.0)
                .with_coupon_rate(0.03)
                .with_id(1),
            BondPosition::new("COI0428", at(2024, 4, 1), 100.0, 1.0)
                .with_coupon_rate(0.0125)
                .with_id(2),
        ];
        let results = valuator().value_all(&positions, ValuationDate::At(at(2024, 11, 1)));
        assert_eq!(results.len(), 2);
        assert!(results[0].result.is_ok());
        assert_eq!(results[1].id, Some(2));
        assert!(matches!(
            results[1].result,
            Err(BondError::MissingField {
                field: "inflation_first_year",
                ..
            })
        ));
    }
}
