//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::indices::RetryPolicy;

/// Flat tax on interest income (19%).
pub const DEFAULT_TAX_RATE: f64 = 0.19;

/// Months the final-period fallback search may step back.
pub const DEFAULT_FALLBACK_MONTHS: u32 = 12;

/// Valuation engine configuration.
///
/// Every field has a default, so a partial TOML table is valid:
///
/// ```rust
/// use obligo_bonds::config::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"fallback_months": 3}"#).unwrap();
/// assert_eq!(config.fallback_months, 3);
/// assert_eq!(config.tax_rate, 0.19);
/// assert_eq!(config.retry.max_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tax withheld on interest
    pub tax_rate: f64,

    /// Bound of the final-period fallback search, in months
    pub fallback_months: u32,

    /// Retry policy for transient index source failures
    pub retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            fallback_months: DEFAULT_FALLBACK_MONTHS,
            retry: RetryPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the fallback search bound.
    #[must_use]
    pub fn with_fallback_months(mut self, months: u32) -> Self {
        self.fallback_months = months;
        self
    }
}
