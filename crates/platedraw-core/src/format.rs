//! Millimeter value formatting and parsing.
//!
//! Dimension labels, hole call-outs and the footer table all share one
//! display rule: a value equal to its own integer truncation is rendered
//! without a decimal point, anything else keeps its decimals with the
//! configured separator. Parsing accepts both decimal comma and decimal dot
//! so records coming from locale-formatted spreadsheets survive the trip.

use serde::{Deserialize, Serialize};

/// Decimal separator policy for on-page labels.
///
/// Injected rather than derived from the system locale so tests can pin
/// exact output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalStyle {
    /// Decimal comma ("7,5"), the shop-floor default.
    #[default]
    Comma,
    /// Decimal dot ("7.5").
    Point,
}

impl DecimalStyle {
    fn separator(self) -> char {
        match self {
            DecimalStyle::Comma => ',',
            DecimalStyle::Point => '.',
        }
    }
}

/// Format a millimeter value for display.
///
/// `10.0` becomes `"10"`, never `"10.0"`; `7.5` becomes `"7,5"` under
/// [`DecimalStyle::Comma`].
pub fn format_mm(value: f64, style: DecimalStyle) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value == value.trunc() {
        return format!("{}", value as i64);
    }
    let text = format!("{}", value);
    match style {
        DecimalStyle::Point => text,
        DecimalStyle::Comma => text.replace('.', ","),
    }
}

/// Parse a millimeter value from producer input.
///
/// Accepts decimal comma or dot, with surrounding whitespace. Returns `None`
/// for empty or unparseable input; callers substitute the documented 0.0
/// default.
pub fn parse_mm(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_values_drop_decimals() {
        assert_eq!(format_mm(10.0, DecimalStyle::Comma), "10");
        assert_eq!(format_mm(100.0, DecimalStyle::Point), "100");
        assert_eq!(format_mm(0.0, DecimalStyle::Comma), "0");
        assert_eq!(format_mm(-3.0, DecimalStyle::Comma), "-3");
    }

    #[test]
    fn test_fractional_values_use_separator() {
        assert_eq!(format_mm(7.5, DecimalStyle::Comma), "7,5");
        assert_eq!(format_mm(7.5, DecimalStyle::Point), "7.5");
        assert_eq!(format_mm(0.25, DecimalStyle::Comma), "0,25");
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(format_mm(f64::NAN, DecimalStyle::Comma), "0");
        assert_eq!(format_mm(f64::INFINITY, DecimalStyle::Point), "0");
    }

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!(parse_mm("12,5"), Some(12.5));
        assert_eq!(parse_mm("12.5"), Some(12.5));
        assert_eq!(parse_mm("  40 "), Some(40.0));
        assert_eq!(parse_mm("-2,25"), Some(-2.25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_mm(""), None);
        assert_eq!(parse_mm("   "), None);
        assert_eq!(parse_mm("abc"), None);
        assert_eq!(parse_mm("1,2,3"), None);
    }
}
