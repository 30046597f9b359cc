//! Year-month publication period.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A calendar month in which a monthly index value is published.
///
/// Ordered chronologically, so it can key ordered maps of index values.
///
/// # Example
///
/// ```rust
/// use obligo_core::types::YearMonth;
///
/// let jan = YearMonth::new(2025, 1).unwrap();
/// assert_eq!(jan.previous(), YearMonth::new(2024, 12).unwrap());
/// assert_eq!(jan.to_string(), "2025-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a new year-month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidMonth` if `month` is outside 1-12.
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the period containing the given instant.
    #[must_use]
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the preceding month, rolling January back into December.
    #[must_use]
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Returns the following month.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

#[derive(Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = CoreError;

    fn try_from(raw: RawYearMonth) -> CoreResult<Self> {
        Self::new(raw.year, raw.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_invalid_month() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!(YearMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn test_previous_rolls_year() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), YearMonth::new(2023, 12).unwrap());
        let nov = YearMonth::new(2024, 11).unwrap();
        assert_eq!(nov.previous(), YearMonth::new(2024, 10).unwrap());
    }

    #[test]
    fn test_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 11, 30)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(YearMonth::from_datetime(&dt), YearMonth::new(2024, 11).unwrap());
    }

    #[test]
    fn test_ordering() {
        let a = YearMonth::new(2023, 12).unwrap();
        let b = YearMonth::new(2024, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_round_trip() {
        let ym = YearMonth::new(2024, 10).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, r#"{"year":2024,"month":10}"#);
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
    }

    #[test]
    fn test_deserialize_rejects_invalid_month() {
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2024,"month":0}"#).is_err());
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2024,"month":13}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_next_undoes_previous(year in 1950i32..2100, month in 1u32..=12) {
            let ym = YearMonth::new(year, month).unwrap();
            prop_assert_eq!(ym.previous().next(), ym);
            prop_assert!(ym.previous() < ym);
        }
    }
}
