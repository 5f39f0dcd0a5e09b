//! Unit conversion module
//!
//! Normalizes ingredient measurements into base units before aggregation.

pub mod converter;
pub mod table;

pub use converter::{commensurable, convert_to_base_unit, same_unit};
pub use table::{
    base_unit_alias, base_unit_for, classify_unit, PassthroughUnit, RecognizedUnit, UnitClass, OUNCES, TEASPOONS,
};
