//! Input validation utilities.
//!
//! This module contains the completeness and numeric checks applied to every submitted value
//! before it reaches a classifier. The same rules apply to every panel.

/// Returns `true` when a submitted text value counts as not entered.
///
/// Whitespace-only input is treated as empty. A literal `"0"` is a value, not an empty field.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a free-text field into a finite `f64`.
///
/// Surrounding whitespace is ignored. Negative numbers, decimals and exponent notation are
/// accepted. `NaN` and infinities are rejected because no classifier can use them.
///
/// Returns `None` if the trimmed text is not a finite number.
pub fn parse_feature(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("0"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_parse_feature_accepts_integers_and_decimals() {
        assert_eq!(parse_feature("120"), Some(120.0));
        assert_eq!(parse_feature("25.0"), Some(25.0));
        assert_eq!(parse_feature(" 0.5 "), Some(0.5));
        assert_eq!(parse_feature("0"), Some(0.0));
    }

    #[test]
    fn test_parse_feature_accepts_negative_values() {
        assert_eq!(parse_feature("-1"), Some(-1.0));
        assert_eq!(parse_feature("-4.813031"), Some(-4.813031));
    }

    #[test]
    fn test_parse_feature_accepts_exponent_notation() {
        assert_eq!(parse_feature("7e-05"), Some(0.00007));
    }

    #[test]
    fn test_parse_feature_rejects_text() {
        assert_eq!(parse_feature("abc"), None);
        assert_eq!(parse_feature("12abc"), None);
        assert_eq!(parse_feature("1,5"), None);
        assert_eq!(parse_feature(""), None);
    }

    #[test]
    fn test_parse_feature_rejects_non_finite() {
        assert_eq!(parse_feature("NaN"), None);
        assert_eq!(parse_feature("inf"), None);
        assert_eq!(parse_feature("-infinity"), None);
    }
}
