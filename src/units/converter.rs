//! Unit conversion functions

use super::table::{base_unit_alias, classify_unit, UnitClass};

/// Convert an amount to its canonical base unit
///
/// Pounds become ounces (x16) and tablespoons become teaspoons (x3).
/// Any other unit, including ones that are already canonical, is returned
/// unchanged. This never fails.
///
/// Examples:
/// - `(2.0, "pounds")` -> `(32.0, "ounces")`
/// - `(2.0, "tbsp")` -> `(6.0, "teaspoons")`
/// - `(2.0, "servings")` -> `(2.0, "servings")`
pub fn convert_to_base_unit(amount: f64, unit: &str) -> (f64, String) {
    match classify_unit(unit) {
        UnitClass::Recognized(recognized) => (
            amount * recognized.factor(),
            recognized.base_unit().to_string(),
        ),
        UnitClass::Passthrough(passthrough) => (amount, passthrough.0),
    }
}

/// Whether two unit strings name the same unit
pub fn same_unit(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Whether two converted quantities can be compared or summed
///
/// Spellings of the same base unit (`oz`, `ounce`, `ounces`) match each
/// other; any other unit only matches itself, ignoring case.
pub fn commensurable(a: &str, b: &str) -> bool {
    match (base_unit_alias(a), base_unit_alias(b)) {
        (Some(x), Some(y)) => x == y,
        _ => same_unit(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pounds_to_ounces() {
        assert_eq!(convert_to_base_unit(2.0, "pounds"), (32.0, "ounces".to_string()));
        assert_eq!(convert_to_base_unit(0.5, "lb"), (8.0, "ounces".to_string()));
    }

    #[test]
    fn test_tablespoons_to_teaspoons() {
        assert_eq!(convert_to_base_unit(2.0, "tbsp"), (6.0, "teaspoons".to_string()));
        assert_eq!(
            convert_to_base_unit(1.0, "tablespoon"),
            (3.0, "teaspoons".to_string())
        );
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(convert_to_base_unit(2.0, "servings"), (2.0, "servings".to_string()));
        assert_eq!(convert_to_base_unit(3.0, "ounces"), (3.0, "ounces".to_string()));
        assert_eq!(convert_to_base_unit(1.5, "Cups"), (1.5, "Cups".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(convert_to_base_unit(1.0, "LB"), convert_to_base_unit(1.0, "lb"));
        assert_eq!(convert_to_base_unit(1.0, "TBSP"), convert_to_base_unit(1.0, "tbsp"));
    }

    #[test]
    fn test_recognized_units_never_keep_input_unit() {
        for unit in ["lb", "pounds", "pound", "tbsp", "tablespoons", "tbs", "tbsps", "tablespoon"] {
            for amount in [0.0, 0.25, 1.0, 7.5, 1000.0] {
                let (converted, base) = convert_to_base_unit(amount, unit);
                let expected_factor = if base == "ounces" { 16.0 } else { 3.0 };
                assert!((converted - amount * expected_factor).abs() < 1e-9);
                assert_ne!(base, unit);
            }
        }
    }

    #[test]
    fn test_same_unit() {
        assert!(same_unit("Ounces", "ounces"));
        assert!(same_unit(" teaspoons", "teaspoons"));
        assert!(!same_unit("ounces", "teaspoons"));
    }

    #[test]
    fn test_commensurable_base_unit_spellings() {
        assert!(commensurable("oz", "ounces"));
        assert!(commensurable("Ounce", "ounces"));
        assert!(commensurable("tsp", "teaspoons"));
        assert!(commensurable("teaspoon", "TSPS"));
        assert!(commensurable("cloves", "Cloves"));

        assert!(!commensurable("oz", "teaspoons"));
        assert!(!commensurable("cups", "ounces"));
        // still needs a factor, so never equal to its base unit
        assert!(!commensurable("lb", "ounces"));
        assert!(!commensurable("tbsp", "teaspoons"));
    }
}
