//! # Value Coercion
//!
//! Turns draft text back into typed JSON scalars, and scalars into text.
//!
//! Classification runs on the trimmed input, first match wins:
//!
//! 1. `null` → null
//! 2. `true` / `false` → boolean
//! 3. a complete decimal number (optional sign, fraction, exponent) → number
//! 4. anything else → the untrimmed input as a string
//!
//! Digit-only text always becomes a number, leading zeros included.

use serde_json::{Number, Value};

/// Coerce raw editor text into a JSON scalar. Never fails.
pub fn coerce(raw: &str) -> Value {
    let trimmed = raw.trim();

    match trimmed {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match parse_number(trimmed) {
            Some(number) => Value::Number(number),
            None => Value::String(raw.to_string()),
        },
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if text.is_empty() || !numeric_chars {
        return None;
    }

    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = text.parse::<u64>() {
        return Some(Number::from(uint));
    }

    let float: f64 = text.parse().ok()?;
    number_from_f64(float)
}

/// 2^63 and 2^64, the exclusive upper bounds of `i64` and `u64` as floats
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// Integral floats are stored as integers so `3.14e2` serializes as `314`.
/// Non-finite values have no JSON form.
fn number_from_f64(float: f64) -> Option<Number> {
    if !float.is_finite() {
        return None;
    }
    if float.fract() == 0.0 {
        if (-I64_BOUND..I64_BOUND).contains(&float) {
            return Some(Number::from(float as i64));
        }
        if (0.0..U64_BOUND).contains(&float) {
            return Some(Number::from(float as u64));
        }
    }
    Number::from_f64(float)
}

/// Rewrite every integral float in `value` as an integer.
///
/// Parsed documents go through this so that a number and its field text
/// coerce back to the same JSON.
pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(normalized) = number.as_f64().and_then(number_from_f64) {
                *number = normalized;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

fn number_text(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        int.to_string()
    } else if let Some(uint) = number.as_u64() {
        uint.to_string()
    } else {
        // f64 Display prints integral values without a trailing ".0"
        number.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

/// Plain string form of a value: strings unquoted, containers as compact JSON
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Draft text for an editable field; absent and null values start empty
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => display_text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_keywords() {
        assert_eq!(coerce("null"), Value::Null);
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("false"), json!(false));
        assert_eq!(coerce("  true \n"), json!(true));
    }

    #[test]
    fn test_coerce_keywords_are_case_sensitive() {
        assert_eq!(coerce("True"), json!("True"));
        assert_eq!(coerce("NULL"), json!("NULL"));
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-7"), json!(-7));
        assert_eq!(coerce("3.5"), json!(3.5));
        assert_eq!(coerce(" 10 "), json!(10));
        assert_eq!(coerce("18446744073709551615"), json!(18446744073709551615u64));
    }

    #[test]
    fn test_coerce_exponent_normalises_to_integer() {
        let value = coerce("3.14e2");
        assert_eq!(value, json!(314));
        assert_eq!(value.to_string(), "314");
    }

    #[test]
    fn test_coerce_large_integral_exponent() {
        assert_eq!(coerce("1e16"), json!(10_000_000_000_000_000i64));
        assert_eq!(coerce("1e19"), json!(10_000_000_000_000_000_000u64));
        assert!(coerce("1e20").is_f64());
    }

    #[test]
    fn test_normalize_numbers() {
        let mut value: Value = serde_json::from_str(r#"{"a": 5.0, "b": [1e16, 2.5], "c": "5.0"}"#).unwrap();
        normalize_numbers(&mut value);

        assert_eq!(value, json!({"a": 5, "b": [10_000_000_000_000_000i64, 2.5], "c": "5.0"}));
        assert_eq!(value["a"].to_string(), "5");
    }

    #[test]
    fn test_normalized_number_survives_field_text() {
        for text in ["5.0", "1e16", "-0.0", "1e19", "1e20", "0.1", "1.5e300"] {
            let mut value: Value = serde_json::from_str(text).unwrap();
            normalize_numbers(&mut value);
            assert_eq!(coerce(&field_text(Some(&value))), value, "{}", text);
        }
    }

    #[test]
    fn test_coerce_leading_zeros_become_numbers() {
        assert_eq!(coerce("007"), json!(7));
    }

    #[test]
    fn test_coerce_string_fallback_is_untrimmed() {
        assert_eq!(coerce(" hello "), json!(" hello "));
        assert_eq!(coerce("12abc"), json!("12abc"));
        assert_eq!(coerce("1e"), json!("1e"));
        assert_eq!(coerce("-"), json!("-"));
    }

    #[test]
    fn test_coerce_rejects_non_finite_spellings() {
        assert_eq!(coerce("inf"), json!("inf"));
        assert_eq!(coerce("NaN"), json!("NaN"));
        assert_eq!(coerce("1e999"), json!("1e999"));
    }

    #[test]
    fn test_coerce_empty_is_empty_string() {
        assert_eq!(coerce(""), json!(""));
        assert_eq!(coerce("   "), json!("   "));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&json!("x")), "x");
        assert_eq!(display_text(&json!(null)), "null");
        assert_eq!(display_text(&json!(1.0)), "1");
        assert_eq!(display_text(&json!(2.5)), "2.5");
        assert_eq!(display_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(None), "");
        assert_eq!(field_text(Some(&json!(null))), "");
        assert_eq!(field_text(Some(&json!(false))), "false");
        assert_eq!(field_text(Some(&json!("a b"))), "a b");
    }
}
