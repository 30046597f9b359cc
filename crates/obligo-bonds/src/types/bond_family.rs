//! Retail treasury bond families.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use obligo_core::types::add_months;
use obligo_core::CoreResult;

/// Bond family, encoded in the first three characters of the identifier.
///
/// | Family | Product | Term |
/// |---|---|---|
/// | `COI` | 4-year inflation-indexed, interest paid out yearly | 48 months |
/// | `EDO` | 10-year inflation-indexed, capitalised | 120 months |
/// | `OTS` | 3-month fixed rate | single 3-month window |
/// | `TOS` | 3-year fixed rate, capitalised | 36 months |
///
/// The family-savings prefixes `ROS` and `ROD` are validated and valued like
/// `COI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BondFamily {
    /// 4-year inflation-indexed bond
    Coi,
    /// 10-year inflation-indexed bond
    Edo,
    /// 3-month fixed rate bond
    Ots,
    /// 3-year fixed rate bond
    Tos,
    /// Not an index-linked retail bond
    Other,
}

impl BondFamily {
    /// Derives the family from an identifier prefix (case-insensitive).
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix.to_uppercase().as_str() {
            "COI" | "ROS" | "ROD" => BondFamily::Coi,
            "EDO" => BondFamily::Edo,
            "OTS" => BondFamily::Ots,
            "TOS" => BondFamily::Tos,
            _ => BondFamily::Other,
        }
    }

    /// Returns the family code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            BondFamily::Coi => "COI",
            BondFamily::Edo => "EDO",
            BondFamily::Ots => "OTS",
            BondFamily::Tos => "TOS",
            BondFamily::Other => "OTHER",
        }
    }

    /// Maximum accrual term in calendar months, if the family has one.
    #[must_use]
    pub fn max_term_months(&self) -> Option<u32> {
        match self {
            BondFamily::Coi => Some(48),
            BondFamily::Edo => Some(120),
            BondFamily::Ots => Some(3),
            BondFamily::Tos => Some(36),
            BondFamily::Other => None,
        }
    }

    /// Returns the maturity instant of a bond bought at `acquired_at`.
    pub fn maturity(&self, acquired_at: NaiveDateTime) -> CoreResult<Option<NaiveDateTime>> {
        self.max_term_months()
            .map(|months| add_months(acquired_at, months))
            .transpose()
    }
}

impl fmt::Display for BondFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_from_prefix() {
        assert_eq!(BondFamily::from_prefix("COI"), BondFamily::Coi);
        assert_eq!(BondFamily::from_prefix("edo"), BondFamily::Edo);
        assert_eq!(BondFamily::from_prefix("ROS"), BondFamily::Coi);
        assert_eq!(BondFamily::from_prefix("ROD"), BondFamily::Coi);
        assert_eq!(BondFamily::from_prefix("OTS"), BondFamily::Ots);
        assert_eq!(BondFamily::from_prefix("TOS"), BondFamily::Tos);
        assert_eq!(BondFamily::from_prefix("DOS"), BondFamily::Other);
    }

    #[test]
    fn test_maturity() {
        let bought = NaiveDate::from_ymd_opt(2020, 2, 29)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let coi = BondFamily::Coi.maturity(bought).unwrap().unwrap();
        assert_eq!(coi.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        let tos = BondFamily::Tos.maturity(bought).unwrap().unwrap();
        assert_eq!(tos.date(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        let ots = BondFamily::Ots.maturity(bought).unwrap().unwrap();
        assert_eq!(ots.date(), NaiveDate::from_ymd_opt(2020, 5, 29).unwrap());
        assert!(BondFamily::Other.maturity(bought).unwrap().is_none());
    }

    #[test]
    fn test_serde_code() {
        assert_eq!(serde_json::to_string(&BondFamily::Edo).unwrap(), r#""EDO""#);
    }
}
