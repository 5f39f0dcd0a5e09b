//! Unit types and conversion constants
//!
//! Classifies raw unit strings coming back from the recipe API into the
//! small set of families we know how to normalize.

use serde::{Deserialize, Serialize};

/// Ounces per pound
pub const OZ_PER_LB: f64 = 16.0;
/// Teaspoons per tablespoon
pub const TSP_PER_TBSP: f64 = 3.0;

/// Canonical weight unit
pub const OUNCES: &str = "ounces";
/// Canonical volume unit
pub const TEASPOONS: &str = "teaspoons";

/// A unit with an entry in the conversion table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizedUnit {
    /// lb, pound, pounds
    Pound,
    /// tbsp, tbs, tbsps, tablespoon, tablespoons
    Tablespoon,
}

impl RecognizedUnit {
    /// Match a unit string against the synonym table
    pub fn from_unit(unit: &str) -> Option<Self> {
        match unit.trim().to_lowercase().as_str() {
            "lb" | "pound" | "pounds" => Some(RecognizedUnit::Pound),
            "tbsp" | "tbs" | "tbsps" | "tablespoon" | "tablespoons" => {
                Some(RecognizedUnit::Tablespoon)
            }
            _ => None,
        }
    }

    /// Multiplier from this unit to its base unit
    pub fn factor(&self) -> f64 {
        match self {
            RecognizedUnit::Pound => OZ_PER_LB,
            RecognizedUnit::Tablespoon => TSP_PER_TBSP,
        }
    }

    /// The base unit quantities are normalized to
    pub fn base_unit(&self) -> &'static str {
        match self {
            RecognizedUnit::Pound => OUNCES,
            RecognizedUnit::Tablespoon => TEASPOONS,
        }
    }
}

/// A unit we do not convert; carried through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassthroughUnit(pub String);

impl PassthroughUnit {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of classifying a raw unit string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitClass {
    Recognized(RecognizedUnit),
    Passthrough(PassthroughUnit),
}

/// Classify a raw unit string
pub fn classify_unit(unit: &str) -> UnitClass {
    match RecognizedUnit::from_unit(unit) {
        Some(recognized) => UnitClass::Recognized(recognized),
        None => UnitClass::Passthrough(PassthroughUnit(unit.to_string())),
    }
}

/// Canonical base unit for a unit string, if it belongs to a known family
///
/// Unlike `classify_unit` this also maps names that are already canonical
/// (`oz`, `tsp`, ...) so the ingredient catalog can record a base unit for them.
pub fn base_unit_for(unit: &str) -> Option<&'static str> {
    match RecognizedUnit::from_unit(unit) {
        Some(recognized) => Some(recognized.base_unit()),
        None => base_unit_alias(unit),
    }
}

/// Canonical name for a spelling of a base unit itself (`oz`, `ounce`, `tsp`, ...)
///
/// Units that still need a factor (`lb`, `tbsp`) are not aliases.
pub fn base_unit_alias(unit: &str) -> Option<&'static str> {
    match unit.trim().to_lowercase().as_str() {
        "oz" | "ounce" | "ounces" => Some(OUNCES),
        "tsp" | "tsps" | "teaspoon" | "teaspoons" => Some(TEASPOONS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_pound_synonyms() {
        for unit in ["lb", "pound", "pounds", "LB", "Pounds", " lb "] {
            assert_eq!(RecognizedUnit::from_unit(unit), Some(RecognizedUnit::Pound), "{unit}");
        }
    }

    #[test]
    fn test_recognize_tablespoon_synonyms() {
        for unit in ["tbsp", "tbs", "tbsps", "tablespoon", "tablespoons", "Tbsp"] {
            assert_eq!(
                RecognizedUnit::from_unit(unit),
                Some(RecognizedUnit::Tablespoon),
                "{unit}"
            );
        }
    }

    #[test]
    fn test_classify_passthrough() {
        assert_eq!(
            classify_unit("servings"),
            UnitClass::Passthrough(PassthroughUnit("servings".to_string()))
        );
        // already-canonical units are not in the conversion table
        assert!(matches!(classify_unit("ounces"), UnitClass::Passthrough(_)));
        assert!(matches!(classify_unit("tsp"), UnitClass::Passthrough(_)));
        assert!(matches!(classify_unit(""), UnitClass::Passthrough(_)));
    }

    #[test]
    fn test_base_unit_for() {
        assert_eq!(base_unit_for("pound"), Some(OUNCES));
        assert_eq!(base_unit_for("oz"), Some(OUNCES));
        assert_eq!(base_unit_for("Tablespoons"), Some(TEASPOONS));
        assert_eq!(base_unit_for("tsp"), Some(TEASPOONS));
        assert_eq!(base_unit_for("cup"), None);
        assert_eq!(base_unit_for(""), None);
    }
}
