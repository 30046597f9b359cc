//! Date-time helpers for position records.

use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::error::{CoreError, CoreResult};

/// Accepted date-time layouts, tried in order.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Accepted date-only layouts; the time defaults to midnight.
pub const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d-%m-%Y", "%Y.%m.%d", "%Y-%m-%d", "%d/%m/%Y"];

/// Parses a date or date-time in any of the accepted layouts.
///
/// # Example
///
/// ```rust
/// use obligo_core::types::parse_datetime;
///
/// let a = parse_datetime("2024-03-15").unwrap();
/// let b = parse_datetime("15.03.2024 00:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_datetime(s: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = s.trim();

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    Err(CoreError::invalid_date(format!(
        "Cannot parse: {trimmed}. Accepted formats: DD.MM.YYYY, DD.MM.YYYY HH:MM, YYYY-MM-DD, etc."
    )))
}

/// Adds calendar months, clamping the day to the end of the target month.
pub fn add_months(dt: NaiveDateTime, months: u32) -> CoreResult<NaiveDateTime> {
    dt.checked_add_months(Months::new(months))
        .ok_or_else(|| CoreError::invalid_date(format!("{dt} + {months} months is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_all_layouts() {
        let expected = at(2024, 3, 15, 10, 30);
        for s in [
            "15.03.2024 10:30",
            "15-03-2024 10:30",
            "2024-03-15 10:30",
            "15/03/2024 10:30",
            "2024.03.15 10:30",
            "2024-03-15T10:30:00",
        ] {
            assert_eq!(parse_datetime(s).unwrap(), expected, "layout {s}");
        }

        let midnight = at(2024, 3, 15, 0, 0);
        for s in ["15.03.2024", "15-03-2024", "2024.03.15", "2024-03-15", "15/03/2024"] {
            assert_eq!(parse_datetime(s).unwrap(), midnight, "layout {s}");
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_datetime("  2024-03-15 ").unwrap(), at(2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("March 15th").is_err());
        assert!(parse_datetime("2024-02-30").is_err());
    }

    #[test]
    fn test_add_months_clamps_end_of_month() {
        let start = at(2024, 1, 31, 12, 0);
        assert_eq!(add_months(start, 1).unwrap(), at(2024, 2, 29, 12, 0));
        assert_eq!(add_months(start, 48).unwrap(), at(2028, 1, 31, 12, 0));
    }
}
