//! Domain types shared across the workspace.
//!
//! - [`YearMonth`]: Publication period of a monthly index
//! - [`Currency`]: ISO currency tag carried through valuations
//! - [`parse_datetime`]: Tolerant parsing of position timestamps

mod currency;
mod date;
mod year_month;

pub use currency::Currency;
pub use date::{add_months, parse_datetime, DATE_FORMATS, DATE_TIME_FORMATS};
pub use year_month::YearMonth;
