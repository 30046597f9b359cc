//! Market data source traits.
//!
//! - [`IndexSource`]: Remote publication source of monthly gross index values

use rust_decimal::Decimal;

use crate::error::TraitError;
use crate::ids::YearMonth;

/// A remote statistical source publishing a monthly gross price index.
///
/// The gross index is expressed against a base of 100: `102.3` means prices
/// rose 2.3% over the reference period.
///
/// Two failure kinds are kept apart:
/// - `Ok(None)`: the source answered but has no row for the period (not yet
///   published, or the filter criteria matched nothing)
/// - `Err(_)`: the source could not be reached or answered garbage
pub trait IndexSource: Send + Sync {
    /// Short name used for logging and source attribution.
    fn name(&self) -> &str;

    /// Fetch the gross index for a period.
    fn fetch_gross(&self, period: YearMonth) -> Result<Option<Decimal>, TraitError>;
}

/// A source with nothing published, for cache-only operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineIndexSource;

impl IndexSource for OfflineIndexSource {
    fn name(&self) -> &str {
        "offline"
    }

    fn fetch_gross(&self, _period: YearMonth) -> Result<Option<Decimal>, TraitError> {
        Ok(None)
    }
}
