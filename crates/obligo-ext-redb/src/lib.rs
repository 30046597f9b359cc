//! # Obligo Ext Redb
//!
//! Embedded rate cache using redb.
//!
//! Published index values are keyed by `(year, month)` in a single table.
//! [`RedbRateCacheStore::insert_if_absent`] checks for the key and inserts
//! inside one write transaction, so concurrent writers for the same period
//! leave exactly one entry behind.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use obligo_core::YearMonth;
use obligo_traits::error::TraitError;
use obligo_traits::storage::{IndexRate, RateCacheStore};

// Table definitions
const INDEX_RATES: TableDefinition<(i32, u32), &[u8]> = TableDefinition::new("index_rates");

fn db_error(e: impl std::fmt::Display) -> TraitError {
    TraitError::DatabaseError(e.to_string())
}

/// Redb-based rate cache.
#[derive(Clone)]
pub struct RedbRateCacheStore {
    db: Arc<Database>,
}

impl RedbRateCacheStore {
    /// Create a rate cache over an open database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Open (or create) a rate cache at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(db_error)?;
        debug!(path = %path.display(), "Opened rate cache");
        Ok(Self::new(Arc::new(db)))
    }
}

fn key(period: YearMonth) -> (i32, u32) {
    (period.year(), period.month())
}

fn decode(bytes: &[u8]) -> Result<IndexRate, TraitError> {
    serde_json::from_slice(bytes).map_err(|e| TraitError::ParseError(e.to_string()))
}

impl RateCacheStore for RedbRateCacheStore {
    fn get(&self, period: YearMonth) -> Result<Option<IndexRate>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_error)?;

        let table = match read_txn.open_table(INDEX_RATES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(db_error(e)),
        };

        match table.get(key(period)) {
            Ok(Some(data)) => decode(data.value()).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(db_error(e)),
        }
    }

    fn insert_if_absent(&self, rate: &IndexRate) -> Result<bool, TraitError> {
        let bytes =
            serde_json::to_vec(rate).map_err(|e| TraitError::SerializationError(e.to_string()))?;

        // redb serializes write transactions, so the check and the insert
        // cannot interleave with another writer.
        let write_txn = self.db.begin_write().map_err(db_error)?;
        let created = {
            let mut table = write_txn.open_table(INDEX_RATES).map_err(db_error)?;
            let exists = table.get(key(rate.period)).map_err(db_error)?.is_some();
            if !exists {
                table
                    .insert(key(rate.period), bytes.as_slice())
                    .map_err(db_error)?;
            }
            !exists
        };
        write_txn.commit().map_err(db_error)?;

        if created {
            debug!(period = %rate.period, rate = %rate.value, "Stored index rate");
        }
        Ok(created)
    }

    fn list(&self) -> Result<Vec<IndexRate>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_error)?;

        let table = match read_txn.open_table(INDEX_RATES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(db_error(e)),
        };

        let mut rates = Vec::new();
        for result in table.iter().map_err(db_error)? {
            let (_, value) = result.map_err(db_error)?;
            rates.push(decode(value.value())?);
        }
        Ok(rates)
    }

    fn count(&self) -> Result<u64, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_error)?;

        let table = match read_txn.open_table(INDEX_RATES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(db_error(e)),
        };

        table.len().map_err(db_error)
    }
}

/// Create a redb rate cache at `path`.
pub fn create_redb_rate_cache(path: impl AsRef<Path>) -> Result<RedbRateCacheStore, TraitError> {
    RedbRateCacheStore::open(path)
}

/// Create a throwaway rate cache for testing.
///
/// Uses a fresh file in the system temp directory.
pub fn create_memory_rate_cache() -> Result<RedbRateCacheStore, TraitError> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_path = std::env::temp_dir().join(format!(
        "obligo_rates_{}_{}.redb",
        std::process::id(),
        id
    ));

    create_redb_rate_cache(&db_path)
}
