//! # Obligo Ext GUS
//!
//! Consumer price index source backed by the public SDP API of Statistics
//! Poland (GUS).
//!
//! One request is made per `(year, month)`. The tabular answer is filtered to
//! the single row for Poland overall measured against the same month of the
//! previous year, and its gross value (base 100) is returned.
//!
//! ```rust,no_run
//! use obligo_core::YearMonth;
//! use obligo_ext_gus::{GusConfig, GusIndexSource};
//! use obligo_traits::market_data::IndexSource;
//!
//! let source = GusIndexSource::new(GusConfig::default())?;
//! let gross = source.fetch_gross(YearMonth::new(2024, 10)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod payload;
mod source;

pub use config::{GusConfig, PERIOD_CODES};
pub use payload::{GusResponse, GusRow};
pub use source::GusIndexSource;
