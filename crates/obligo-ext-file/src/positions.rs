//! JSON position source.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use obligo_core::types::parse_datetime;
use obligo_core::Currency;
use obligo_traits::error::TraitError;
use obligo_traits::ids::InstrumentId;
use obligo_traits::reference_data::{BondPosition, PositionSource, BOND_ASSET_TYPE};

// =============================================================================
// JSON POSITION SOURCE
// =============================================================================

/// JSON record for one purchase.
///
/// Dates accept every format of [`parse_datetime`], e.g. `15.03.2024 10:30`
/// or `2024-03-15`.
#[derive(Debug, Deserialize)]
struct PositionRecord {
    id: Option<u64>,
    #[serde(alias = "isin")]
    identifier: String,
    name: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
    #[serde(alias = "date")]
    acquired_at: String,
    transaction_price: f64,
    amount: f64,
    coupon_rate: Option<f64>,
    inflation_first_year: Option<f64>,
    currency: Option<String>,
}

impl PositionRecord {
    fn into_position(self, fallback_id: u64) -> Result<BondPosition, TraitError> {
        let acquired_at = parse_datetime(&self.acquired_at)
            .map_err(|e| TraitError::ParseError(format!("{}: {e}", self.identifier)))?;
        let currency = match self.currency.as_deref() {
            Some(code) => code
                .parse::<Currency>()
                .map_err(|e| TraitError::ParseError(format!("{}: {e}", self.identifier)))?,
            None => Currency::default(),
        };

        let mut position = BondPosition::new(
            InstrumentId::new(self.identifier),
            acquired_at,
            self.transaction_price,
            self.amount,
        )
        .with_id(self.id.unwrap_or(fallback_id))
        .with_asset_type(self.asset_type.unwrap_or_else(|| BOND_ASSET_TYPE.to_string()))
        .with_currency(currency);
        position.name = self.name;
        position.coupon_rate = self.coupon_rate;
        position.inflation_first_year = self.inflation_first_year;
        Ok(position)
    }
}

/// Position source backed by a JSON file.
///
/// Records without an `id` are numbered by their 1-based position in the
/// file, moving up to the next free number when an explicit `id` already
/// holds it. A missing file is an empty portfolio.
pub struct JsonPositionSource {
    file_path: PathBuf,
    positions: DashMap<u64, BondPosition>,
    by_identifier: DashMap<InstrumentId, Vec<u64>>,
}

impl JsonPositionSource {
    /// Create a new JSON position source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            positions: DashMap::new(),
            by_identifier: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload positions from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        self.positions.clear();
        self.by_identifier.clear();

        if !self.file_path.exists() {
            return Ok(()); // Empty source
        }

        let content = std::fs::read_to_string(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;
        let records: Vec<PositionRecord> =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        let mut taken: HashSet<u64> = HashSet::new();
        for id in records.iter().filter_map(|r| r.id) {
            if !taken.insert(id) {
                return Err(TraitError::InvalidInput(format!("duplicate position id {id}")));
            }
        }

        for (index, record) in records.into_iter().enumerate() {
            let id = match record.id {
                Some(id) => id,
                None => {
                    let mut candidate = index as u64 + 1;
                    while taken.contains(&candidate) {
                        candidate += 1;
                    }
                    taken.insert(candidate);
                    candidate
                }
            };
            let position = record.into_position(id)?;
            self.by_identifier
                .entry(position.identifier.clone())
                .or_default()
                .push(id);
            self.positions.insert(id, position);
        }

        debug!(
            path = %self.file_path.display(),
            positions = self.positions.len(),
            "Loaded positions"
        );
        Ok(())
    }

    /// Number of loaded positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no positions are loaded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PositionSource for JsonPositionSource {
    fn get_by_id(&self, id: u64) -> Result<Option<BondPosition>, TraitError> {
        Ok(self.positions.get(&id).map(|p| p.clone()))
    }

    fn find(
        &self,
        identifier: &InstrumentId,
        acquired_on: Option<NaiveDate>,
    ) -> Result<Option<BondPosition>, TraitError> {
        let Some(ids) = self.by_identifier.get(identifier) else {
            return Ok(None);
        };

        let found = ids
            .iter()
            .filter_map(|id| self.positions.get(id).map(|p| p.clone()))
            .filter(|p| acquired_on.map_or(true, |day| p.acquired_at.date() == day))
            .min_by_key(|p| p.acquired_at);
        Ok(found)
    }

    fn list(&self) -> Result<Vec<BondPosition>, TraitError> {
        let mut positions: Vec<BondPosition> =
            self.positions.iter().map(|entry| entry.value().clone()).collect();
        positions.sort_by_key(|p| p.id);
        Ok(positions)
    }
}
