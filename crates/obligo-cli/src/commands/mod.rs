//! CLI command implementations.

pub mod config;
pub mod rates;
pub mod value;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use rates::RatesArgs;
pub use value::ValueArgs;

use std::path::Path;
use std::sync::Arc;

use obligo_bonds::indices::RateResolver;
use obligo_core::YearMonth;
use obligo_ext_gus::GusIndexSource;
use obligo_ext_redb::RedbRateCacheStore;
use obligo_traits::market_data::{IndexSource, OfflineIndexSource};

use crate::config::ObligoConfig;
use crate::error::CliResult;

/// Opens the rate cache, creating its directory if needed.
pub fn open_rate_cache(config: &ObligoConfig) -> CliResult<Arc<RedbRateCacheStore>> {
    let path = Path::new(&config.storage_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Arc::new(RedbRateCacheStore::open(path)?))
}

/// Builds a resolver over the configured cache and source.
pub fn build_resolver(config: &ObligoConfig, offline: bool) -> CliResult<RateResolver> {
    let cache = open_rate_cache(config)?;
    let source: Arc<dyn IndexSource> = if offline {
        Arc::new(OfflineIndexSource)
    } else {
        Arc::new(GusIndexSource::new(config.source.clone())?)
    };
    Ok(RateResolver::new(cache, source))
}

/// Parses a publication period.
pub fn parse_period(year: i32, month: u32) -> CliResult<YearMonth> {
    Ok(YearMonth::new(year, month)?)
}
