//! Position valuation.

mod valuation;

pub use valuation::{PositionValuation, ValuationDate, ValuationResult, Valuator};
