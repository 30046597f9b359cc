//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date: {0}. Use YYYY-MM-DD, DD.MM.YYYY or 'today'.")]
    InvalidDate(String),

    /// Invalid index rate.
    #[error("Invalid rate: {0}. Use a decimal fraction such as 0.0280.")]
    InvalidRate(String),

    /// Position not found in the portfolio.
    #[error("No position {0} in the portfolio")]
    PositionNotFound(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid date, month or currency.
    #[error(transparent)]
    Core(#[from] obligo_core::CoreError),

    /// Storage or source error.
    #[error(transparent)]
    Data(#[from] obligo_traits::TraitError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
