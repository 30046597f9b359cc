//! The accrual walk.
//!
//! A bond's life is cut into a first period, whole intermediate accrual years
//! and a final partial period:
//!
//! ```text
//! start      +1y          +2y          +3y     end
//!   |---------|------------|------------|-------|
//!     First    Intermediate Intermediate  Final
//! ```
//!
//! When no more than 365.25 whole days elapse, the first period is the only
//! one and covers the elapsed days.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use obligo_core::daycounts::{accrual_year, Act36525, DayCount, DAY_COUNT_BASIS};
use obligo_core::YearMonth;

use crate::accrual::{AccrualPolicy, PeriodKind, ValuationPeriod};
use crate::config::EngineConfig;
use crate::error::RateError;
use crate::indices::{LookupPolicy, RateResolver, RetryPolicy};

/// Terms of a bond needed by the walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerms {
    /// Family rule
    pub policy: AccrualPolicy,
    /// Principal paid
    pub principal: f64,
    /// Fixed annual margin
    pub margin: f64,
    /// Index component of the first period (zero for fixed-rate families)
    pub first_year_index: f64,
}

impl BondTerms {
    /// Creates bond terms.
    #[must_use]
    pub fn new(policy: AccrualPolicy, principal: f64, margin: f64, first_year_index: f64) -> Self {
        Self {
            policy,
            principal,
            margin,
            first_year_index,
        }
    }
}

/// Result of a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualOutcome {
    /// Value after deferred tax
    pub value: f64,
    /// Periods visited, in order
    pub periods: Vec<ValuationPeriod>,
}

#[derive(Debug, Clone, Copy)]
enum WalkState {
    First,
    Intermediate(NaiveDateTime),
    Final(NaiveDateTime),
    Done,
}

/// Walks a bond's life and accrues interest period by period.
#[derive(Debug, Clone)]
pub struct AccrualWalker {
    resolver: RateResolver,
    retry: RetryPolicy,
    fallback_months: u32,
    tax_rate: f64,
}

impl AccrualWalker {
    /// Creates a walker.
    pub fn new(resolver: RateResolver, config: &EngineConfig) -> Self {
        Self {
            resolver,
            retry: config.retry,
            fallback_months: config.fallback_months,
            tax_rate: config.tax_rate,
        }
    }

    /// The resolver used for index-linked periods.
    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    /// Accrues from `start` to `end`; `end` must already be clipped to maturity.
    pub fn walk(
        &self,
        terms: &BondTerms,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<AccrualOutcome, RateError> {
        if end <= start {
            return Ok(AccrualOutcome {
                value: terms.principal,
                periods: Vec::new(),
            });
        }

        let year = accrual_year();
        let mut running = terms.principal;
        let mut periods = Vec::new();
        let mut state = WalkState::First;

        loop {
            state = match state {
                WalkState::First => {
                    let elapsed = Act36525.day_count(start, end) as f64;
                    let (days, period_end, next) = if elapsed <= DAY_COUNT_BASIS {
                        (elapsed, end, WalkState::Done)
                    } else {
                        let boundary = start + year;
                        (DAY_COUNT_BASIS, boundary, WalkState::Intermediate(boundary))
                    };
                    let period = ValuationPeriod {
                        kind: PeriodKind::First,
                        start,
                        end: period_end,
                        days,
                        index_rate: terms.first_year_index,
                        index_period: None,
                        margin: terms.margin,
                    };
                    running = self.apply(terms, &period, running, &mut periods);
                    next
                }
                WalkState::Intermediate(current) => {
                    let boundary = current + year;
                    if boundary <= end {
                        let anchor = YearMonth::from_datetime(&current);
                        let (index_rate, index_period) =
                            self.index_for(terms, anchor, LookupPolicy::Exact)?;
                        let period = ValuationPeriod {
                            kind: PeriodKind::Intermediate,
                            start: current,
                            end: boundary,
                            days: DAY_COUNT_BASIS,
                            index_rate,
                            index_period,
                            margin: terms.margin,
                        };
                        running = self.apply(terms, &period, running, &mut periods);
                        WalkState::Intermediate(boundary)
                    } else {
                        WalkState::Final(current)
                    }
                }
                WalkState::Final(current) => {
                    let remaining = Act36525.day_count(current, end);
                    if remaining > 0 {
                        let anchor = YearMonth::from_datetime(&current);
                        let lookup = LookupPolicy::LatestPublished {
                            max_steps: self.fallback_months,
                        };
                        let (index_rate, index_period) = self.index_for(terms, anchor, lookup)?;
                        let period = ValuationPeriod {
                            kind: PeriodKind::Final,
                            start: current,
                            end,
                            days: remaining as f64,
                            index_rate,
                            index_period,
                            margin: terms.margin,
                        };
                        running = self.apply(terms, &period, running, &mut periods);
                    }
                    WalkState::Done
                }
                WalkState::Done => break,
            };
        }

        let value = terms
            .policy
            .finalize(running, terms.principal, self.tax_rate);
        Ok(AccrualOutcome { value, periods })
    }

    fn apply(
        &self,
        terms: &BondTerms,
        period: &ValuationPeriod,
        running: f64,
        periods: &mut Vec<ValuationPeriod>,
    ) -> f64 {
        let next = terms
            .policy
            .accrue(period, running, terms.principal, self.tax_rate);
        debug!(
            kind = ?period.kind,
            start = %period.start,
            days = period.days,
            rate = period.rate(),
            value = next,
            "Accrued period"
        );
        periods.push(period.clone());
        next
    }

    fn index_for(
        &self,
        terms: &BondTerms,
        anchor: YearMonth,
        lookup: LookupPolicy,
    ) -> Result<(f64, Option<YearMonth>), RateError> {
        if !terms.policy.is_index_linked() {
            return Ok((0.0, None));
        }
        let resolved = self.resolver.resolve_with(anchor, lookup, &self.retry)?;
        let rate = resolved.value.to_f64().ok_or_else(|| RateError::Source {
            period: resolved.period,
            reason: format!("rate {} is not representable", resolved.value),
        })?;
        Ok((rate, Some(resolved.period)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{MemoryIndexSource, MemoryRateStore};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn walker(source: MemoryIndexSource) -> (AccrualWalker, Arc<MemoryIndexSource>) {
        let source = Arc::new(source);
        let resolver = RateResolver::new(Arc::new(MemoryRateStore::new()), source.clone());
        let config = EngineConfig::default().with_retry(RetryPolicy::no_delay(5));
        (AccrualWalker::new(resolver, &config), source)
    }

    #[test]
    fn test_single_first_period() {
        let (walker, source) = walker(MemoryIndexSource::new());
        let terms = BondTerms::new(AccrualPolicy::Coi, 1000.0, 0.05, 0.03);

        let outcome = walker.walk(&terms, at(2024, 1, 1), at(2024, 7, 19)).unwrap();
        assert_eq!(outcome.periods.len(), 1);
        assert_relative_eq!(outcome.periods[0].days, 200.0);
        assert_relative_eq!(
            outcome.value,
            1000.0 + 1000.0 * 0.08 * 200.0 / 365.25 * 0.81,
            epsilon = 1e-9
        );
        assert_eq!(source.requests(), 0);
    }

    #[test]
    fn test_periods_partition_the_walk() {
        let (walker, _) = walker(
            MemoryIndexSource::new()
                .with_gross(ym(2021, 1), dec!(102.6))
                .with_gross(ym(2022, 1), dec!(109.4))
                .with_gross(ym(2023, 1), dec!(116.6)),
        );
        let terms = BondTerms::new(AccrualPolicy::Edo, 100.0, 0.01, 0.017);

        let outcome = walker.walk(&terms, at(2020, 1, 15), at(2023, 3, 1)).unwrap();
        let kinds: Vec<_> = outcome.periods.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PeriodKind::First,
                PeriodKind::Intermediate,
                PeriodKind::Intermediate,
                PeriodKind::Final
            ]
        );
        for pair in outcome.periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(outcome.periods[1].index_period, Some(ym(2021, 1)));
        assert_eq!(outcome.periods[2].index_period, Some(ym(2022, 1)));
        assert_eq!(outcome.periods[3].index_period, Some(ym(2023, 1)));
        assert_relative_eq!(outcome.periods[3].index_rate, 0.166);
    }

    #[test]
    fn test_fixed_rate_never_resolves() {
        let (walker, source) = walker(MemoryIndexSource::new());
        let terms = BondTerms::new(AccrualPolicy::Tos, 100.0, 0.0595, 0.0);

        let outcome = walker.walk(&terms, at(2022, 4, 1), at(2025, 4, 1)).unwrap();
        // The last boundary lands 6 hours before maturity: no final period.
        assert_eq!(outcome.periods.len(), 3);
        assert_eq!(source.requests(), 0);
        assert!(outcome.periods.iter().all(|p| p.index_rate == 0.0));
    }

    #[test]
    fn test_end_before_start_returns_principal() {
        let (walker, _) = walker(MemoryIndexSource::new());
        let terms = BondTerms::new(AccrualPolicy::Edo, 700.0, 0.02, 0.07);

        let outcome = walker.walk(&terms, at(2024, 5, 1), at(2024, 5, 1)).unwrap();
        assert_eq!(outcome.value, 700.0);
        assert!(outcome.periods.is_empty());
    }

    #[test]
    fn test_missing_intermediate_rate_fails() {
        let (walker, _) = walker(MemoryIndexSource::new());
        let terms = BondTerms::new(AccrualPolicy::Coi, 100.0, 0.0125, 0.0685);

        let err = walker
            .walk(&terms, at(2021, 6, 1), at(2023, 7, 1))
            .unwrap_err();
        assert!(matches!(err, RateError::Unpublished { .. }));
    }
}
