//! Cache-first index rate resolver.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use obligo_core::YearMonth;
use obligo_traits::market_data::IndexSource;
use obligo_traits::storage::{IndexRate, RateCacheStore};
use obligo_traits::TraitError;

use crate::error::RateError;
use crate::indices::RetryPolicy;

/// Converts a gross index (base 100) to a decimal-fraction rate, 4 dp.
///
/// ```rust
/// use obligo_bonds::indices::gross_to_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(gross_to_rate(dec!(102.3)), dec!(0.0230));
/// assert_eq!(gross_to_rate(dec!(99.64)), dec!(-0.0036));
/// ```
#[must_use]
pub fn gross_to_rate(gross: Decimal) -> Decimal {
    ((gross - Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED).round_dp(4)
}

/// How a period is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupPolicy {
    /// The requested period only.
    Exact,
    /// The requested period, or the latest published one at most
    /// `max_steps` months earlier.
    LatestPublished {
        /// Months the search may step back
        max_steps: u32,
    },
}

/// A rate together with the period it was actually published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    /// Period asked for
    pub requested: YearMonth,
    /// Period the value belongs to
    pub period: YearMonth,
    /// Rate as a decimal fraction
    pub value: Decimal,
}

impl ResolvedRate {
    /// Returns true if the search had to step back.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.requested != self.period
    }
}

/// Resolves monthly index rates through a cache and a remote source.
///
/// A cached period is never fetched again. On a miss the gross value is
/// fetched, converted with [`gross_to_rate`] and persisted. The resolver does
/// not retry; see [`RetryPolicy`].
#[derive(Clone)]
pub struct RateResolver {
    cache: Arc<dyn RateCacheStore>,
    source: Arc<dyn IndexSource>,
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

impl RateResolver {
    /// Creates a resolver over a cache and a source.
    pub fn new(cache: Arc<dyn RateCacheStore>, source: Arc<dyn IndexSource>) -> Self {
        Self { cache, source }
    }

    /// The underlying rate cache.
    pub fn cache(&self) -> &Arc<dyn RateCacheStore> {
        &self.cache
    }

    /// Resolves the rate of one period.
    pub fn resolve(&self, period: YearMonth) -> Result<Decimal, RateError> {
        if let Some(cached) = self.cache.get(period).map_err(storage_error)? {
            debug!(period = %period, rate = %cached.value, "Index rate cache hit");
            return Ok(cached.value);
        }

        debug!(period = %period, source = self.source.name(), "Index rate cache miss");
        let gross = self
            .source
            .fetch_gross(period)
            .map_err(|e| source_error(period, e))?
            .ok_or(RateError::Unpublished { period })?;

        let rate = IndexRate::with_source(period, gross_to_rate(gross), self.source.name());
        if self.cache.insert_if_absent(&rate).map_err(storage_error)? {
            info!(period = %period, rate = %rate.value, gross = %gross, "Index rate cached");
            return Ok(rate.value);
        }

        // Another writer got there first; its value is the one on record.
        match self.cache.get(period).map_err(storage_error)? {
            Some(stored) => Ok(stored.value),
            None => Ok(rate.value),
        }
    }

    /// Resolves a period under a lookup policy, retrying transient failures.
    pub fn resolve_with(
        &self,
        period: YearMonth,
        policy: LookupPolicy,
        retry: &RetryPolicy,
    ) -> Result<ResolvedRate, RateError> {
        let max_steps = match policy {
            LookupPolicy::Exact => 0,
            LookupPolicy::LatestPublished { max_steps } => max_steps,
        };

        let mut candidate = period;
        let mut step = 0;
        loop {
            match retry.run(candidate, || self.resolve(candidate)) {
                Ok(value) => {
                    return Ok(ResolvedRate {
                        requested: period,
                        period: candidate,
                        value,
                    })
                }
                Err(err) if matches!(policy, LookupPolicy::Exact) => return Err(err),
                Err(err) if !err.allows_fallback() => return Err(err),
                Err(err) if step >= max_steps => {
                    warn!(anchor = %period, oldest = %candidate, error = %err, "Fallback search exhausted");
                    return Err(RateError::FallbackExhausted {
                        anchor: period,
                        oldest: candidate,
                    });
                }
                Err(err) => {
                    let earlier = candidate.previous();
                    warn!(
                        period = %candidate,
                        next = %earlier,
                        error = %err,
                        "Index rate unavailable, stepping back one month"
                    );
                    candidate = earlier;
                    step += 1;
                }
            }
        }
    }
}

fn storage_error(err: TraitError) -> RateError {
    RateError::Storage {
        reason: err.to_string(),
    }
}

fn source_error(period: YearMonth, err: TraitError) -> RateError {
    if err.is_transient() {
        RateError::Transient {
            period,
            reason: err.to_string(),
        }
    } else {
        RateError::Source {
            period,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{MemoryIndexSource, MemoryRateStore};
    use rust_decimal_macros::dec;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn resolver_with(
        source: MemoryIndexSource,
    ) -> (RateResolver, Arc<MemoryRateStore>, Arc<MemoryIndexSource>) {
        let store = Arc::new(MemoryRateStore::new());
        let source = Arc::new(source);
        let resolver = RateResolver::new(store.clone(), source.clone());
        (resolver, store, source)
    }

    #[test]
    fn test_resolve_caches_once() {
        let (resolver, store, source) =
            resolver_with(MemoryIndexSource::new().with_gross(ym(2024, 3), dec!(101.9)));

        assert_eq!(resolver.resolve(ym(2024, 3)).unwrap(), dec!(0.0190));
        assert_eq!(resolver.resolve(ym(2024, 3)).unwrap(), dec!(0.0190));
        assert_eq!(source.requests(), 1);
        assert_eq!(store.count().unwrap(), 1);

        let cached = store.get(ym(2024, 3)).unwrap().unwrap();
        assert_eq!(cached.source.as_deref(), Some("memory"));
    }

    #[test]
    fn test_cached_value_wins_over_source() {
        let (resolver, store, source) =
            resolver_with(MemoryIndexSource::new().with_gross(ym(2023, 6), dec!(112.0)));
        store
            .insert_if_absent(&IndexRate::new(ym(2023, 6), dec!(0.1150)))
            .unwrap();

        assert_eq!(resolver.resolve(ym(2023, 6)).unwrap(), dec!(0.1150));
        assert_eq!(source.requests(), 0);
    }

    #[test]
    fn test_unpublished_and_transport_errors_are_distinct() {
        let (resolver, _, _) = resolver_with(MemoryIndexSource::new().with_transient_failures(1));

        let err = resolver.resolve(ym(2024, 11)).unwrap_err();
        assert!(err.is_transient());

        let err = resolver.resolve(ym(2024, 11)).unwrap_err();
        assert_eq!(err, RateError::Unpublished { period: ym(2024, 11) });
    }

    #[test]
    fn test_fallback_to_previous_month() {
        let (resolver, store, _) =
            resolver_with(MemoryIndexSource::new().with_gross(ym(2024, 10), dec!(105.0)));

        let resolved = resolver
            .resolve_with(
                ym(2024, 11),
                LookupPolicy::LatestPublished { max_steps: 12 },
                &RetryPolicy::no_delay(5),
            )
            .unwrap();
        assert_eq!(resolved.period, ym(2024, 10));
        assert_eq!(resolved.value, dec!(0.0500));
        assert!(resolved.is_fallback());
        assert!(store.get(ym(2024, 11)).unwrap().is_none());
    }

    #[test]
    fn test_fallback_crosses_year_boundary() {
        let (resolver, _, _) =
            resolver_with(MemoryIndexSource::new().with_gross(ym(2023, 12), dec!(106.2)));

        let resolved = resolver
            .resolve_with(
                ym(2024, 2),
                LookupPolicy::LatestPublished { max_steps: 12 },
                &RetryPolicy::no_delay(1),
            )
            .unwrap();
        assert_eq!(resolved.period, ym(2023, 12));
        assert_eq!(resolved.value, dec!(0.0620));
    }

    #[test]
    fn test_fallback_exhausted() {
        let (resolver, _, source) = resolver_with(MemoryIndexSource::new());

        let err = resolver
            .resolve_with(
                ym(2024, 3),
                LookupPolicy::LatestPublished { max_steps: 2 },
                &RetryPolicy::no_delay(1),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RateError::FallbackExhausted {
                anchor: ym(2024, 3),
                oldest: ym(2024, 1),
            }
        );
        assert_eq!(source.requests(), 3);
    }

    #[test]
    fn test_exact_does_not_step_back() {
        let (resolver, _, _) =
            resolver_with(MemoryIndexSource::new().with_gross(ym(2024, 10), dec!(105.0)));

        let err = resolver
            .resolve_with(ym(2024, 11), LookupPolicy::Exact, &RetryPolicy::no_delay(1))
            .unwrap_err();
        assert_eq!(err, RateError::Unpublished { period: ym(2024, 11) });
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let (resolver, _, source) = resolver_with(
            MemoryIndexSource::new()
                .with_gross(ym(2022, 5), dec!(113.9))
                .with_transient_failures(3),
        );

        let resolved = resolver
            .resolve_with(ym(2022, 5), LookupPolicy::Exact, &RetryPolicy::no_delay(5))
            .unwrap();
        assert_eq!(resolved.value, dec!(0.1390));
        assert_eq!(source.requests(), 4);
    }
}
