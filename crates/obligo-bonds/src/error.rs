//! Error types for bond valuation.

use thiserror::Error;

use obligo_core::YearMonth;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Failures of index rate resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    /// The source has no row for the period (not yet published).
    #[error("No index value published for {period}")]
    Unpublished {
        /// Requested period.
        period: YearMonth,
    },

    /// The source could not be reached.
    #[error("Index source unreachable for {period}: {reason}")]
    Transient {
        /// Requested period.
        period: YearMonth,
        /// Transport failure description.
        reason: String,
    },

    /// The source answered with something unusable.
    #[error("Index source failed for {period}: {reason}")]
    Source {
        /// Requested period.
        period: YearMonth,
        /// Failure description.
        reason: String,
    },

    /// The rate cache failed.
    #[error("Rate cache error: {reason}")]
    Storage {
        /// Failure description.
        reason: String,
    },

    /// Fallback search walked back to its bound without finding a value.
    #[error("No index value published between {oldest} and {anchor}")]
    FallbackExhausted {
        /// Period the search started from.
        anchor: YearMonth,
        /// Oldest period tried.
        oldest: YearMonth,
    },
}

impl RateError {
    /// Returns true for failures the retry policy should repeat.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, RateError::Transient { .. })
    }

    /// Returns true if the fallback search may step to an earlier month.
    ///
    /// Cache failures are never stepped over.
    #[must_use]
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            RateError::Unpublished { .. } | RateError::Transient { .. } | RateError::Source { .. }
        )
    }
}

/// Errors that can occur while valuing a bond position.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// Required indexing field is absent for the bond family.
    #[error("{family} bonds require {field} ({identifier})")]
    MissingField {
        /// Family prefix that needs the field.
        family: String,
        /// The missing field name.
        field: &'static str,
        /// Instrument identifier.
        identifier: String,
    },

    /// Declared asset type is not a bond.
    #[error("Cannot value {identifier}: asset type '{asset_type}' is not a bond")]
    UnsupportedAssetType {
        /// Instrument identifier.
        identifier: String,
        /// Declared asset type.
        asset_type: String,
    },

    /// Valuation date precedes the acquisition date.
    #[error("Cannot value {identifier} on {valuation_date}: acquired on {acquired_on}")]
    ValuationBeforeAcquisition {
        /// Instrument identifier.
        identifier: String,
        /// Requested valuation date.
        valuation_date: String,
        /// Acquisition date.
        acquired_on: String,
    },

    /// Position carries unusable numbers.
    #[error("Invalid position {identifier}: {reason}")]
    InvalidPosition {
        /// Instrument identifier.
        identifier: String,
        /// Description of what's invalid.
        reason: String,
    },

    /// An index rate needed by the accrual walk could not be resolved.
    #[error("Valuation of {identifier} failed: {source}")]
    RateUnavailable {
        /// Instrument identifier.
        identifier: String,
        /// Underlying resolution failure.
        #[source]
        source: RateError,
    },

    /// The computed value is NaN or infinite.
    #[error("Valuation of {identifier} produced a non-finite value ({value})")]
    NonFiniteResult {
        /// Instrument identifier.
        identifier: String,
        /// The offending value.
        value: f64,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    CoreError(#[from] obligo_core::CoreError),
}

impl BondError {
    /// Returns true for caller input errors, which are never worth retrying.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BondError::MissingField { .. }
                | BondError::UnsupportedAssetType { .. }
                | BondError::ValuationBeforeAcquisition { .. }
                | BondError::InvalidPosition { .. }
        )
    }

    /// Creates an invalid position error.
    #[must_use]
    pub fn invalid_position(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPosition {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}
