//! # Obligo Traits
//!
//! Trait definitions for the collaborators of the Obligo valuation engine.
//!
//! This crate contains ONLY trait definitions and the plain data they carry.
//! All implementations are in separate extension crates.
//!
//! ## Module Structure
//!
//! - [`storage`]: Cache of published index values ([`storage::RateCacheStore`])
//! - [`market_data`]: Remote publication source of index values ([`market_data::IndexSource`])
//! - [`reference_data`]: Portfolio positions ([`reference_data::PositionSource`])
//!
//! ## Dependency Injection
//!
//! The engine receives its collaborators as trait objects:
//!
//! ```ignore
//! let resolver = RateResolver::new(
//!     Arc::new(RedbRateCacheStore::open("rates.redb")?),
//!     Arc::new(GusIndexSource::new(GusConfig::default())?),
//! );
//! ```
//!
//! All traits are synchronous: a valuation runs to completion on the calling
//! thread and remote fetches block.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod market_data;
pub mod reference_data;
pub mod storage;

// Re-export commonly used types
pub use error::TraitError;
pub use ids::*;
