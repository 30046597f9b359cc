//! Storage traits for persistence.
//!
//! - [`RateCacheStore`]: Cache of published monthly index values
//!
//! Storage implementations are EXTENSIONS (e.g., redb, in-memory).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use crate::ids::YearMonth;

/// A cached index value for one publication period.
///
/// Published index values are historical facts: once stored, an entry is
/// never overwritten or invalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRate {
    /// Publication period
    pub period: YearMonth,
    /// Rate as a decimal fraction (e.g., 0.0280 for +2.8% year on year)
    pub value: Decimal,
    /// Where the value came from (optional)
    pub source: Option<String>,
}

impl IndexRate {
    /// Creates a new index rate.
    pub fn new(period: YearMonth, value: Decimal) -> Self {
        Self {
            period,
            value,
            source: None,
        }
    }

    /// Creates a new index rate with a source attribution.
    pub fn with_source(period: YearMonth, value: Decimal, source: &str) -> Self {
        Self {
            period,
            value,
            source: Some(source.to_string()),
        }
    }

    /// Returns the rate as a percentage (e.g., 2.80 for 2.8%).
    pub fn value_percent(&self) -> Decimal {
        self.value * Decimal::ONE_HUNDRED
    }
}

/// Idempotent key-value cache over (year, month) -> index rate.
///
/// Implementations must guarantee at most one entry per period, even when
/// two writers race on the same period: the first successful write wins and
/// later writes for that period are no-ops.
pub trait RateCacheStore: Send + Sync {
    /// Get the cached rate for a period.
    fn get(&self, period: YearMonth) -> Result<Option<IndexRate>, TraitError>;

    /// Insert a rate unless the period is already cached.
    ///
    /// Returns `true` if this call created the entry.
    fn insert_if_absent(&self, rate: &IndexRate) -> Result<bool, TraitError>;

    /// List all cached rates ordered by period.
    fn list(&self) -> Result<Vec<IndexRate>, TraitError>;

    /// Count cached rates.
    fn count(&self) -> Result<u64, TraitError> {
        Ok(self.list()?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_index_rate_percent() {
        let period = YearMonth::new(2024, 10).unwrap();
        let rate = IndexRate::with_source(period, dec!(0.028), "GUS");
        assert_eq!(rate.value_percent(), dec!(2.8));
        assert_eq!(rate.source.as_deref(), Some("GUS"));
    }

    #[test]
    fn test_index_rate_json_shape() {
        let rate = IndexRate::new(YearMonth::new(2024, 10).unwrap(), dec!(0.028));
        let json = serde_json::to_value(&rate).unwrap();
        assert_eq!(json["period"]["year"], 2024);
        assert_eq!(json["period"]["month"], 10);
    }
}
