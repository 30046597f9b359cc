//! Accrual periods.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use obligo_core::daycounts::{Act36525, DayCount};
use obligo_core::YearMonth;

/// Position of a period in the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// First year, accrued at the first-year fixed rate
    First,
    /// Whole year after the first, at the rate published for its start month
    Intermediate,
    /// Remaining partial year, at the latest published rate
    Final,
}

/// One accrual period `[start, end)`, no longer than one accrual year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationPeriod {
    /// Position in the walk
    pub kind: PeriodKind,
    /// Period start
    pub start: NaiveDateTime,
    /// Period end
    pub end: NaiveDateTime,
    /// Day count (365.25 for a whole accrual year)
    pub days: f64,
    /// Index component of the rate
    pub index_rate: f64,
    /// Publication period of the index, when one was resolved
    pub index_period: Option<YearMonth>,
    /// Fixed margin component of the rate
    pub margin: f64,
}

impl ValuationPeriod {
    /// Total annual rate of the period.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.index_rate + self.margin
    }

    /// Year fraction on the Actual/365.25 basis.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        Act36525.year_fraction_days(self.days)
    }
}
