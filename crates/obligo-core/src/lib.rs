//! # Obligo Core
//!
//! Core types and conventions shared by every Obligo crate.
//!
//! - **Types**: [`YearMonth`] publication periods, [`Currency`] tags and
//!   tolerant date-time parsing for position records
//! - **Day Count**: the Actual/365.25 basis used by retail treasury bonds
//!
//! ## Example
//!
//! ```rust
//! use obligo_core::prelude::*;
//!
//! let acquired = parse_datetime("15.03.2024 10:30").unwrap();
//! let period = YearMonth::from_datetime(&acquired);
//! assert_eq!(period.previous(), YearMonth::new(2024, 2).unwrap());
//!
//! let yf = Act36525.year_fraction_days(365.25);
//! assert_eq!(yf, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{accrual_year, Act36525, DayCount, DAY_COUNT_BASIS};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{add_months, parse_datetime, Currency, YearMonth};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, YearMonth};
