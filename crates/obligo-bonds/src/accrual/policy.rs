//! Per-family interest, compounding and tax rules.

use serde::{Deserialize, Serialize};

use crate::accrual::ValuationPeriod;
use crate::types::BondFamily;

/// Interest rule of a modeled bond family.
///
/// | Policy | Interest per period | Base | Tax |
/// |---|---|---|---|
/// | `Coi` | `P * (index + margin) * yf`, net | principal | each period |
/// | `Edo` | `v * (index + margin) * yf`, gross | running value | once, on the gain |
/// | `Ots` | `P * margin * yf`, net | principal | each period |
/// | `Tos` | `v * margin * yf`, gross | running value | once, on the gain |
///
/// COI pays its interest out, so it never compounds; EDO capitalises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccrualPolicy {
    /// 4-year inflation-indexed, simple interest
    Coi,
    /// 10-year inflation-indexed, compounding
    Edo,
    /// 3-month fixed rate
    Ots,
    /// 3-year fixed rate, compounding
    Tos,
}

impl AccrualPolicy {
    /// Policy of a family, `None` for families the engine does not model.
    #[must_use]
    pub fn for_family(family: BondFamily) -> Option<Self> {
        match family {
            BondFamily::Coi => Some(AccrualPolicy::Coi),
            BondFamily::Edo => Some(AccrualPolicy::Edo),
            BondFamily::Ots => Some(AccrualPolicy::Ots),
            BondFamily::Tos => Some(AccrualPolicy::Tos),
            BondFamily::Other => None,
        }
    }

    /// Returns true if periods after the first need a published index.
    #[must_use]
    pub fn is_index_linked(&self) -> bool {
        matches!(self, AccrualPolicy::Coi | AccrualPolicy::Edo)
    }

    /// Returns true if interest accrues on the running value.
    #[must_use]
    pub fn compounds(&self) -> bool {
        matches!(self, AccrualPolicy::Edo | AccrualPolicy::Tos)
    }

    /// Applies one period to the running value.
    #[must_use]
    pub fn accrue(&self, period: &ValuationPeriod, running: f64, principal: f64, tax: f64) -> f64 {
        let yf = period.year_fraction();
        let interest = match self {
            AccrualPolicy::Coi => principal * period.rate() * yf * (1.0 - tax),
            AccrualPolicy::Edo => running * period.rate() * yf,
            AccrualPolicy::Ots => principal * period.margin * yf * (1.0 - tax),
            AccrualPolicy::Tos => running * period.margin * yf,
        };
        running + interest
    }

    /// Applies deferred tax once the walk is done.
    #[must_use]
    pub fn finalize(&self, running: f64, principal: f64, tax: f64) -> f64 {
        if self.compounds() {
            running - (running - principal) * tax
        } else {
            running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::PeriodKind;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn period(days: f64, index_rate: f64, margin: f64) -> ValuationPeriod {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ValuationPeriod {
            kind: PeriodKind::First,
            start,
            end: start,
            days,
            index_rate,
            index_period: None,
            margin,
        }
    }

    #[test]
    fn test_coi_accrues_on_principal_net() {
        let p = period(365.25, 0.03, 0.05);
        let v = AccrualPolicy::Coi.accrue(&p, 1080.0, 1000.0, 0.19);
        assert_relative_eq!(v, 1080.0 + 1000.0 * 0.08 * 0.81, epsilon = 1e-9);
        assert_relative_eq!(AccrualPolicy::Coi.finalize(v, 1000.0, 0.19), v);
    }

    #[test]
    fn test_edo_compounds_then_taxes_gain() {
        let p = period(365.25, 0.02, 0.04);
        let v = AccrualPolicy::Edo.accrue(&p, 530.0, 500.0, 0.19);
        assert_relative_eq!(v, 530.0 * 1.06, epsilon = 1e-9);
        let net = AccrualPolicy::Edo.finalize(v, 500.0, 0.19);
        assert_relative_eq!(net, v - (v - 500.0) * 0.19, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_rate_families_ignore_index() {
        let p = period(91.0, 0.5, 0.03);
        let ots = AccrualPolicy::Ots.accrue(&p, 100.0, 100.0, 0.19);
        assert_relative_eq!(ots, 100.0 + 100.0 * 0.03 * 91.0 / 365.25 * 0.81, epsilon = 1e-12);
        let tos = AccrualPolicy::Tos.accrue(&p, 200.0, 100.0, 0.19);
        assert_relative_eq!(tos, 200.0 + 200.0 * 0.03 * 91.0 / 365.25, epsilon = 1e-12);
    }

    #[test]
    fn test_for_family() {
        assert_eq!(AccrualPolicy::for_family(BondFamily::Tos), Some(AccrualPolicy::Tos));
        assert_eq!(AccrualPolicy::for_family(BondFamily::Other), None);
        assert!(AccrualPolicy::Coi.is_index_linked());
        assert!(!AccrualPolicy::Tos.is_index_linked());
        assert!(AccrualPolicy::Tos.compounds());
        assert!(!AccrualPolicy::Ots.compounds());
    }
}
