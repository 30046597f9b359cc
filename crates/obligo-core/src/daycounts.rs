//! Day count conventions for retail treasury bond accrual.
//!
//! Retail inflation-indexed bonds accrue on an Actual/365.25 basis: the
//! numerator is the count of whole calendar days between two instants and
//! the denominator is the average Julian year. The same basis defines the
//! length of one accrual year (365 days and 6 hours), so a period that spans
//! exactly one accrual year has a year fraction of exactly one.
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use obligo_core::daycounts::{Act36525, DayCount};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//! assert_eq!(Act36525.day_count(start, end), 200);
//! assert!((Act36525.year_fraction(start, end) - 200.0 / 365.25).abs() < 1e-15);
//! ```

use chrono::{Duration, NaiveDateTime};

/// Year basis of the Actual/365.25 convention.
pub const DAY_COUNT_BASIS: f64 = 365.25;

/// Length of one accrual year: 365 days and 6 hours.
#[must_use]
pub fn accrual_year() -> Duration {
    Duration::minutes(525_960)
}

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Converts a (possibly fractional) day count into a year fraction.
    fn year_fraction_days(&self, days: f64) -> f64;

    /// Counts whole days between two instants, truncating partial days.
    ///
    /// Negative when `end` precedes `start`.
    fn day_count(&self, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        (end - start).num_days()
    }

    /// Calculates the year fraction between two instants.
    fn year_fraction(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        self.year_fraction_days(self.day_count(start, end) as f64)
    }
}

/// Actual/365.25 day count convention.
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365.25}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act36525;

impl DayCount for Act36525 {
    fn name(&self) -> &'static str {
        "ACT/365.25"
    }

    fn year_fraction_days(&self, days: f64) -> f64 {
        days / DAY_COUNT_BASIS
    }
}
