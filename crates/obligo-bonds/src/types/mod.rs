//! Bond domain types.

mod bond_family;

pub use bond_family::BondFamily;
