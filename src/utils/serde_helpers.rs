//! Lenient accessors for the loosely-typed JSON the node returns.
//!
//! The node reports most numbers as strings and omits fields freely, so every
//! accessor here has a default and none of them can fail.

use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

/// Parse an integer the way a forgiving UI would: leading digits of a string,
/// truncation of a float, and `0` for anything else.
pub fn safe_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => safe_int_str(s),
        _ => 0,
    }
}

/// `safe_int` over an optional object member.
pub fn int_field(obj: &Value, key: &str) -> i64 {
    obj.get(key).map(safe_int).unwrap_or(0)
}

/// Parse a decimal amount string, `0.0` for anything non-numeric.
pub fn safe_float(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Read a string member. Numbers are rendered as strings; missing, null and
/// empty values yield `default`.
pub fn string_field(obj: &Value, key: &str, default: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Read a boolean member, `false` unless it is literally `true`.
pub fn bool_field(obj: &Value, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Bool(true)))
}

/// Accept any JSON value for an error message and render it as text.
pub fn lenient_message<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Leading-digits integer parse of a string, `0` when there are none.
pub fn safe_int_str(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_int_handles_strings_numbers_and_junk() {
        assert_eq!(safe_int(&json!("1234")), 1234);
        assert_eq!(safe_int(&json!("  42 blocks")), 42);
        assert_eq!(safe_int(&json!("-7")), -7);
        assert_eq!(safe_int(&json!(12.9)), 12);
        assert_eq!(safe_int(&json!("abc")), 0);
        assert_eq!(safe_int(&json!("")), 0);
        assert_eq!(safe_int(&json!(null)), 0);
        assert_eq!(safe_int(&json!(true)), 0);
        assert_eq!(safe_int(&json!({"block": 1})), 0);
    }

    #[test]
    fn safe_float_rejects_non_finite() {
        assert_eq!(safe_float("1.5"), 1.5);
        assert_eq!(safe_float("NaN"), 0.0);
        assert_eq!(safe_float("inf"), 0.0);
        assert_eq!(safe_float("twelve"), 0.0);
    }

    #[test]
    fn string_field_defaults() {
        let obj = json!({"a": "x", "b": "", "c": 3, "d": null});
        assert_eq!(string_field(&obj, "a", "0"), "x");
        assert_eq!(string_field(&obj, "b", "0"), "0");
        assert_eq!(string_field(&obj, "c", "0"), "3");
        assert_eq!(string_field(&obj, "d", "0"), "0");
        assert_eq!(string_field(&obj, "missing", ""), "");
    }
}
