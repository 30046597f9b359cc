//! # Obligo Bonds
//!
//! Valuation engine for retail inflation- and margin-indexed treasury bonds.
//!
//! The engine is built from four parts, leaves first:
//!
//! - [`indices`]: Resolves monthly CPI-derived index rates through a cache, a
//!   remote publication source and a backward-stepping fallback search
//! - [`classification`]: Derives the [`BondFamily`] from the identifier prefix
//!   and validates the indexing fields the family needs
//! - [`accrual`]: Walks the bond's life period by period and applies the
//!   family's interest, compounding and tax rules
//! - [`pricing`]: The [`Valuator`] entry point tying the above together
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use obligo_bonds::prelude::*;
//! use obligo_traits::market_data::OfflineIndexSource;
//! use obligo_traits::reference_data::BondPosition;
//!
//! let resolver = RateResolver::new(
//!     Arc::new(MemoryRateStore::new()),
//!     Arc::new(OfflineIndexSource),
//! );
//! let valuator = Valuator::new(resolver, EngineConfig::default());
//!
//! let bought = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let position = BondPosition::new("COI0128", bought, 1000.0, 10.0)
//!     .with_coupon_rate(0.05)
//!     .with_inflation_first_year(0.03);
//!
//! let valued_on = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
//! let result = valuator.value(&position, ValuationDate::from(valued_on)).unwrap();
//! let expected = 1000.0 + 1000.0 * 0.08 * 200.0 / 365.25 * 0.81;
//! assert!((result.value - expected).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod accrual;
pub mod classification;
pub mod config;
pub mod error;
pub mod indices;
pub mod pricing;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accrual::{AccrualOutcome, AccrualPolicy, AccrualWalker, BondTerms};
    pub use crate::classification::{classify, BondClassification};
    pub use crate::config::EngineConfig;
    pub use crate::error::{BondError, BondResult, RateError};
    pub use crate::indices::{
        LookupPolicy, MemoryIndexSource, MemoryRateStore, RateResolver, ResolvedRate,
        RetryPolicy,
    };
    pub use crate::pricing::{PositionValuation, ValuationDate, ValuationResult, Valuator};
    pub use crate::types::BondFamily;
}

pub use error::{BondError, BondResult, RateError};
pub use pricing::{ValuationDate, ValuationResult, Valuator};
pub use types::BondFamily;
