//! Identifier types used across the valuation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use obligo_core::YearMonth;

/// Instrument identifier, e.g. `COI0428` or `EDO1234`.
///
/// The first three characters name the bond family.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    /// Create a new instrument ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-cased three-character family prefix, if present.
    pub fn prefix(&self) -> Option<String> {
        let prefix: String = self.0.chars().take(3).collect();
        if prefix.chars().count() == 3 {
            Some(prefix.to_uppercase())
        } else {
            None
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InstrumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(InstrumentId::new("coi0428").prefix().as_deref(), Some("COI"));
        assert_eq!(InstrumentId::new("EDO").prefix().as_deref(), Some("EDO"));
        assert_eq!(InstrumentId::new("ED").prefix(), None);
    }
}
