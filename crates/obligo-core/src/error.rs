//! Error types for the Obligo core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core type construction and parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Month outside 1-12.
    #[error("Invalid month: {month}. Month must be between 1 and 12")]
    InvalidMonth {
        /// The rejected month number.
        month: u32,
    },

    /// Unknown currency code.
    #[error("Unknown currency code: {code}")]
    UnknownCurrency {
        /// The rejected code.
        code: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));

        let err = CoreError::InvalidMonth { month: 13 };
        assert!(err.to_string().contains("between 1 and 12"));
    }
}
