//! # Obligo Ext File
//!
//! File-based position data for the Obligo valuation engine.
//!
//! - [`JsonPositionSource`]: bond purchases read from a JSON array

#![warn(missing_docs)]
#![warn(clippy::all)]

mod positions;

pub use positions::*;

use std::path::Path;
use std::sync::Arc;

use obligo_traits::error::TraitError;
use obligo_traits::reference_data::PositionSource;

/// Create a file-based position provider.
pub fn create_file_positions(
    positions_json: impl AsRef<Path>,
) -> Result<Arc<dyn PositionSource>, TraitError> {
    Ok(Arc::new(JsonPositionSource::new(positions_json)?))
}
