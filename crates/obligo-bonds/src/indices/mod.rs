//! Monthly index rate resolution.
//!
//! - [`RateResolver`]: cache-first lookup with remote fetch on miss and a
//!   backward-stepping search for the latest published period
//! - [`MemoryRateStore`]: in-memory [`RateCacheStore`](obligo_traits::storage::RateCacheStore)
//! - [`MemoryIndexSource`]: in-memory [`IndexSource`](obligo_traits::market_data::IndexSource)
//!   with request counting and injectable transport failures
//! - [`RetryPolicy`]: fixed-attempt, fixed-delay retry of transient failures

mod memory_source;
mod rate_store;
mod resolver;
mod retry;

pub use memory_source::MemoryIndexSource;
pub use rate_store::MemoryRateStore;
pub use resolver::{gross_to_rate, LookupPolicy, RateResolver, ResolvedRate};
pub use retry::RetryPolicy;
