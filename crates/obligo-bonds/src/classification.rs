//! Bond family classification and indexing-field validation.

use serde::{Deserialize, Serialize};

use obligo_traits::reference_data::BOND_ASSET_TYPE;
use obligo_traits::InstrumentId;

use crate::error::{BondError, BondResult};
use crate::types::BondFamily;

/// Family and sanitized indexing fields of a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondClassification {
    /// Bond family derived from the identifier prefix
    pub family: BondFamily,
    /// Fixed annual margin, if applicable to the family
    pub coupon_rate: Option<f64>,
    /// First-year fixed rate, if applicable to the family
    pub inflation_first_year: Option<f64>,
}

impl BondClassification {
    fn not_indexed() -> Self {
        Self {
            family: BondFamily::Other,
            coupon_rate: None,
            inflation_first_year: None,
        }
    }
}

/// Classifies a position and sanitizes its indexing fields.
///
/// - Declared type other than "bond": both fields cleared
/// - `COI`, `EDO`, `ROS`, `ROD`: both fields required
/// - `OTS`, `TOS`: margin required, first-year rate dropped
/// - Any other prefix: both fields cleared
///
/// # Example
///
/// ```rust
/// use obligo_bonds::classification::classify;
/// use obligo_bonds::BondFamily;
/// use obligo_traits::InstrumentId;
///
/// let c = classify("bond", &InstrumentId::new("TOS0327"), Some(0.0595), Some(0.01)).unwrap();
/// assert_eq!(c.family, BondFamily::Tos);
/// assert_eq!(c.inflation_first_year, None);
/// ```
pub fn classify(
    asset_type: &str,
    identifier: &InstrumentId,
    coupon_rate: Option<f64>,
    inflation_first_year: Option<f64>,
) -> BondResult<BondClassification> {
    if !asset_type.trim().eq_ignore_ascii_case(BOND_ASSET_TYPE) {
        return Ok(BondClassification::not_indexed());
    }

    let Some(prefix) = identifier.prefix() else {
        return Ok(BondClassification::not_indexed());
    };

    let family = BondFamily::from_prefix(&prefix);
    let missing = |field: &'static str| BondError::MissingField {
        family: prefix.clone(),
        field,
        identifier: identifier.to_string(),
    };

    match family {
        BondFamily::Coi | BondFamily::Edo => {
            let coupon_rate = coupon_rate.ok_or_else(|| missing("coupon_rate"))?;
            let first_year = inflation_first_year.ok_or_else(|| missing("inflation_first_year"))?;
            Ok(BondClassification {
                family,
                coupon_rate: Some(coupon_rate),
                inflation_first_year: Some(first_year),
            })
        }
        BondFamily::Ots | BondFamily::Tos => {
            let coupon_rate = coupon_rate.ok_or_else(|| missing("coupon_rate"))?;
            Ok(BondClassification {
                family,
                coupon_rate: Some(coupon_rate),
                inflation_first_year: None,
            })
        }
        BondFamily::Other => Ok(BondClassification::not_indexed()),
    }
}
