//! Answer value helpers
//!
//! Submitted answers are untyped JSON values. These helpers define the
//! emptiness, coercion, and comparison semantics the visibility operators
//! and the analytics aggregator share.

use serde_json::Value;
use std::cmp::Ordering;

/// Empty means null, a blank (whitespace-only) string, or a zero-length array.
/// A missing answer is handled by callers passing `Value::Null`.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Coerce a value to f64 for numeric aggregation and ordering comparisons.
///
/// JSON numbers convert directly; strings convert when they parse as a
/// number after trimming. Everything else (bool, null, arrays, objects)
/// is not numeric.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Stringify a value the way a dynamically-typed host would: bare strings,
/// numbers and booleans in their plain form, `null` for null, and arrays
/// comma-joined element-wise. Used by the CONTAINS substring check.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Ordering comparison for GREATER_THAN / LESS_THAN and friends.
///
/// Numeric when both sides coerce to a number (so `"5" > 3` holds), string
/// comparison when both are strings, and None for any other pairing;
/// callers treat None as a failed condition.
pub fn compare_order(actual: &Value, expected: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_number(actual), as_number(expected)) {
        return a.partial_cmp(&b);
    }

    if let (Value::String(a), Value::String(b)) = (actual, expected) {
        return Some(a.as_str().cmp(b.as_str()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!("   \t ")));
        assert!(is_empty_value(&json!([])));

        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("x")));
        assert!(!is_empty_value(&json!([null])));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(as_number(&json!(5)), Some(5.0));
        assert_eq!(as_number(&json!(5.5)), Some(5.5));
        assert_eq!(as_number(&json!("42")), Some(42.0));
        assert_eq!(as_number(&json!(" 3.5 ")), Some(3.5));

        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("")), None);
        assert_eq!(as_number(&json!(true)), None);
        assert_eq!(as_number(&Value::Null), None);
        assert_eq!(as_number(&json!([5])), None);
    }

    #[test]
    fn test_display_string() {
        assert_eq!(display_string(&json!("yes")), "yes");
        assert_eq!(display_string(&json!(5)), "5");
        assert_eq!(display_string(&json!(true)), "true");
        assert_eq!(display_string(&Value::Null), "null");
        assert_eq!(display_string(&json!(["a", 1])), "a,1");
    }

    #[test]
    fn test_compare_order_numeric() {
        assert_eq!(compare_order(&json!(5), &json!(3)), Some(Ordering::Greater));
        assert_eq!(compare_order(&json!("5"), &json!(3)), Some(Ordering::Greater));
        assert_eq!(compare_order(&json!(2), &json!("10")), Some(Ordering::Less));
        assert_eq!(compare_order(&json!(7), &json!(7)), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_order_strings() {
        assert_eq!(
            compare_order(&json!("apple"), &json!("banana")),
            Some(Ordering::Less)
        );
        // Non-numeric strings compare lexicographically, so "10" < "9"
        assert_eq!(
            compare_order(&json!("10x"), &json!("9x")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_compare_order_mismatched_types() {
        assert_eq!(compare_order(&json!(true), &json!(1)), None);
        assert_eq!(compare_order(&Value::Null, &json!(3)), None);
        assert_eq!(compare_order(&json!([1]), &json!(1)), None);
        assert_eq!(compare_order(&json!("abc"), &json!(3)), None);
    }
}
