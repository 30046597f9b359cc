//! Period-by-period accrual over a bond's life.

mod period;
mod policy;
mod walker;

pub use period::{PeriodKind, ValuationPeriod};
pub use policy::AccrualPolicy;
pub use walker::{AccrualOutcome, AccrualWalker, BondTerms};
