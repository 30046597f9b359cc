//! In-memory rate cache.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use obligo_core::YearMonth;
use obligo_traits::storage::{IndexRate, RateCacheStore};
use obligo_traits::TraitError;

/// Rate cache held in memory, ordered by period.
///
/// Suitable for tests and offline runs. The first write for a period wins.
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    rates: RwLock<BTreeMap<YearMonth, IndexRate>>,
}

impl MemoryRateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with rates. Later duplicates are ignored.
    #[must_use]
    pub fn from_rates(rates: impl IntoIterator<Item = IndexRate>) -> Self {
        let mut map = BTreeMap::new();
        for rate in rates {
            map.entry(rate.period).or_insert(rate);
        }
        Self {
            rates: RwLock::new(map),
        }
    }
}

impl RateCacheStore for MemoryRateStore {
    fn get(&self, period: YearMonth) -> Result<Option<IndexRate>, TraitError> {
        Ok(self.rates.read().get(&period).cloned())
    }

    fn insert_if_absent(&self, rate: &IndexRate) -> Result<bool, TraitError> {
        let mut rates = self.rates.write();
        if rates.contains_key(&rate.period) {
            return Ok(false);
        }
        rates.insert(rate.period, rate.clone());
        Ok(true)
    }

    fn list(&self) -> Result<Vec<IndexRate>, TraitError> {
        Ok(self.rates.read().values().cloned().collect())
    }

    fn count(&self) -> Result<u64, TraitError> {
        Ok(self.rates.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_first_write_wins() {
        let store = MemoryRateStore::new();
        assert!(store
            .insert_if_absent(&IndexRate::new(ym(2024, 10), dec!(0.0500)))
            .unwrap());
        assert!(!store
            .insert_if_absent(&IndexRate::new(ym(2024, 10), dec!(0.0900)))
            .unwrap());
        assert_eq!(store.get(ym(2024, 10)).unwrap().unwrap().value, dec!(0.0500));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_is_ordered() {
        let store = MemoryRateStore::from_rates(vec![
            IndexRate::new(ym(2024, 2), dec!(0.0280)),
            IndexRate::new(ym(2023, 12), dec!(0.0620)),
            IndexRate::new(ym(2024, 1), dec!(0.0370)),
        ]);
        let periods: Vec<_> = store.list().unwrap().iter().map(|r| r.period).collect();
        assert_eq!(periods, vec![ym(2023, 12), ym(2024, 1), ym(2024, 2)]);
    }

    #[test]
    fn test_concurrent_inserts_create_one_entry() {
        let store = Arc::new(MemoryRateStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let value = dec!(0.04) + Decimal::from(i);
                    store
                        .insert_if_absent(&IndexRate::new(ym(2024, 5), value))
                        .unwrap()
                })
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|created| *created)
            .count();
        assert_eq!(created, 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_period() {
        let store = MemoryRateStore::new();
        assert!(store.get(ym(2030, 1)).unwrap().is_none());
    }
}
