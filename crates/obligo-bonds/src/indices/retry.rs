//! Retry policy for transient index source failures.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use obligo_core::YearMonth;

use crate::error::RateError;

/// Default number of attempts per period.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between attempts, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Fixed-attempt, fixed-delay retry of transient failures.
///
/// Only [`RateError::Transient`] is retried. Every other failure is returned
/// after the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    #[must_use]
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }

    /// Same attempt budget, no pause. Used in tests.
    #[must_use]
    pub fn no_delay(max_attempts: u32) -> Self {
        Self::new(max_attempts, 0)
    }

    /// Pause between attempts.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Runs `op` until it succeeds, fails non-transiently or the budget is spent.
    pub fn run<T, F>(&self, period: YearMonth, mut op: F) -> Result<T, RateError>
    where
        F: FnMut() -> Result<T, RateError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Err(err) if err.is_transient() && attempt < attempts => {
                    warn!(
                        period = %period,
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "Transient index source failure, retrying"
                    );
                    if self.delay_ms > 0 {
                        thread::sleep(self.delay());
                    }
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn transient() -> RateError {
        RateError::Transient {
            period: period(),
            reason: "connection reset".into(),
        }
    }

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_retries_transient_until_success() {
        let mut calls = 0;
        let result = RetryPolicy::no_delay(5).run(period(), || {
            calls += 1;
            if calls < 3 {
                Err(transient())
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_budget() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::no_delay(4).run(period(), || {
            calls += 1;
            Err(transient())
        });
        assert_eq!(result, Err(transient()));
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_does_not_retry_unpublished() {
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::no_delay(5).run(period(), || {
            calls += 1;
            Err(RateError::Unpublished { period: period() })
        });
        assert!(matches!(result, Err(RateError::Unpublished { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let mut calls = 0;
        let _ = RetryPolicy::no_delay(0).run(period(), || {
            calls += 1;
            Err::<(), _>(transient())
        });
        assert_eq!(calls, 1);
    }
}
