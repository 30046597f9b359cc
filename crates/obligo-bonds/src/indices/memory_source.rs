//! In-memory index source.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rust_decimal::Decimal;

use obligo_core::YearMonth;
use obligo_traits::market_data::IndexSource;
use obligo_traits::TraitError;

/// Gross index values held in memory.
///
/// Counts every request and can fail the next `n` requests with a
/// connection error, which makes resolver and retry behavior observable.
#[derive(Debug, Default)]
pub struct MemoryIndexSource {
    gross: RwLock<BTreeMap<YearMonth, Decimal>>,
    requests: AtomicUsize,
    failures_left: AtomicUsize,
}

impl MemoryIndexSource {
    /// Creates a source with nothing published.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a gross index value (base 100).
    #[must_use]
    pub fn with_gross(self, period: YearMonth, gross: Decimal) -> Self {
        self.publish(period, gross);
        self
    }

    /// Fails the next `n` requests with [`TraitError::ConnectionFailed`].
    #[must_use]
    pub fn with_transient_failures(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Publishes a gross index value (base 100).
    pub fn publish(&self, period: YearMonth, gross: Decimal) {
        self.gross.write().insert(period, gross);
    }

    /// Number of requests served so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl IndexSource for MemoryIndexSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_gross(&self, period: YearMonth) -> Result<Option<Decimal>, TraitError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TraitError::ConnectionFailed(format!(
                "simulated outage for {period}"
            )));
        }
        Ok(self.gross.read().get(&period).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_failures_then_value() {
        let period = YearMonth::new(2024, 6).unwrap();
        let source = MemoryIndexSource::new()
            .with_gross(period, dec!(102.6))
            .with_transient_failures(2);

        assert!(source.fetch_gross(period).unwrap_err().is_transient());
        assert!(source.fetch_gross(period).is_err());
        assert_eq!(source.fetch_gross(period).unwrap(), Some(dec!(102.6)));
        assert_eq!(source.requests(), 3);
    }

    #[test]
    fn test_unpublished_is_none() {
        let source = MemoryIndexSource::new();
        assert_eq!(source.fetch_gross(YearMonth::new(2024, 11).unwrap()).unwrap(), None);
    }
}
