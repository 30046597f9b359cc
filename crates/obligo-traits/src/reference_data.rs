//! Reference data source traits.
//!
//! - [`PositionSource`]: Bond positions held in a portfolio
//!
//! Positions are owned by the persistence layer and are immutable for the
//! duration of a valuation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use obligo_core::Currency;

use crate::error::TraitError;
use crate::ids::InstrumentId;

/// Asset type tag of a bond position.
pub const BOND_ASSET_TYPE: &str = "bond";

fn default_asset_type() -> String {
    BOND_ASSET_TYPE.to_string()
}

/// A bond purchase held in a portfolio.
///
/// Rates are decimal fractions: `0.04` is 4%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPosition {
    /// Numeric record id assigned by the persistence layer
    #[serde(default)]
    pub id: Option<u64>,
    /// Instrument identifier (first three characters encode the family)
    pub identifier: InstrumentId,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Declared asset type tag
    #[serde(default = "default_asset_type", rename = "type")]
    pub asset_type: String,
    /// Acquisition date-time
    pub acquired_at: NaiveDateTime,
    /// Principal paid
    pub transaction_price: f64,
    /// Number of units bought
    pub amount: f64,
    /// Fixed annual margin
    #[serde(default)]
    pub coupon_rate: Option<f64>,
    /// Fixed rate for the first year (index-linked families)
    #[serde(default)]
    pub inflation_first_year: Option<f64>,
    /// Currency tag
    #[serde(default)]
    pub currency: Currency,
}

impl BondPosition {
    /// Creates a bond position with no indexing fields.
    pub fn new(
        identifier: impl Into<InstrumentId>,
        acquired_at: NaiveDateTime,
        transaction_price: f64,
        amount: f64,
    ) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            name: None,
            asset_type: default_asset_type(),
            acquired_at,
            transaction_price,
            amount,
            coupon_rate: None,
            inflation_first_year: None,
            currency: Currency::default(),
        }
    }

    /// Sets the fixed annual margin.
    #[must_use]
    pub fn with_coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the first-year fixed rate.
    #[must_use]
    pub fn with_inflation_first_year(mut self, rate: f64) -> Self {
        self.inflation_first_year = Some(rate);
        self
    }

    /// Sets the declared asset type tag.
    #[must_use]
    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = asset_type.into();
        self
    }

    /// Sets the currency tag.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the numeric record id.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns true if the declared type is a bond (case-insensitive).
    pub fn is_bond(&self) -> bool {
        self.asset_type.trim().eq_ignore_ascii_case(BOND_ASSET_TYPE)
    }
}

/// Trait for position providers.
pub trait PositionSource: Send + Sync {
    /// Get a position by its numeric record id.
    fn get_by_id(&self, id: u64) -> Result<Option<BondPosition>, TraitError>;

    /// Find a position by identifier, optionally narrowed to an acquisition day.
    ///
    /// When several purchases share an identifier and no day is given, the
    /// earliest purchase is returned.
    fn find(
        &self,
        identifier: &InstrumentId,
        acquired_on: Option<NaiveDate>,
    ) -> Result<Option<BondPosition>, TraitError>;

    /// List all positions.
    fn list(&self) -> Result<Vec<BondPosition>, TraitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "identifier": "EDO0434",
            "acquired_at": "2024-04-02T09:15:00",
            "transaction_price": 500.0,
            "amount": 5.0,
            "coupon_rate": 0.02,
            "inflation_first_year": 0.068
        }"#;
        let position: BondPosition = serde_json::from_str(json).unwrap();
        assert_eq!(position.identifier.as_str(), "EDO0434");
        assert!(position.is_bond());
        assert_eq!(position.currency, Currency::PLN);
        assert_eq!(position.id, None);
    }

    #[test]
    fn test_is_bond_ignores_case() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let position = BondPosition::new("COI0428", at, 100.0, 1.0).with_asset_type("BOND");
        assert!(position.is_bond());
        assert!(!position.with_asset_type("equity").is_bond());
    }
}
