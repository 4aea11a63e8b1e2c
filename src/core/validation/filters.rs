//! Reusable field filters
//!
//! These filters normalize form field values before validation

use anyhow::Result;
use serde_json::Value;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to uppercase
pub fn uppercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_uppercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: treat an empty string as an absent value
pub fn empty_as_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_str() {
        Some("") => Ok(Value::Null),
        _ => Ok(value),
    }
}

/// Filter: turn numeric strings into JSON numbers
///
/// HTML forms submit every input as text; `"4500"` becomes `4500`.
/// Strings that are not numbers pass through for the validators to report.
pub fn parse_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let trimmed = s.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Ok(Value::from(int));
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => Ok(Value::from(float)),
            _ => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        let result = f("name", json!("  hello  ")).expect("should not fail");
        assert_eq!(result, json!("hello"));
    }

    #[test]
    fn test_trim_empty_string() {
        let f = trim();
        let result = f("name", json!("   ")).expect("should not fail");
        assert_eq!(result, json!(""));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let f = trim();
        assert_eq!(f("age", json!(42)).unwrap(), json!(42));
        assert_eq!(f("name", json!(null)).unwrap(), json!(null));
    }

    // === uppercase() / lowercase() ===

    #[test]
    fn test_uppercase_converts_string() {
        let f = uppercase();
        let result = f("code", json!("stcw-bst")).expect("should not fail");
        assert_eq!(result, json!("STCW-BST"));
    }

    #[test]
    fn test_lowercase_converts_string() {
        let f = lowercase();
        let result = f("email", json!("User@Example.COM")).expect("should not fail");
        assert_eq!(result, json!("user@example.com"));
    }

    #[test]
    fn test_case_filters_non_string_passthrough() {
        assert_eq!(uppercase()("count", json!(42)).unwrap(), json!(42));
        assert_eq!(lowercase()("flag", json!(true)).unwrap(), json!(true));
    }

    // === empty_as_null() ===

    #[test]
    fn test_empty_as_null() {
        let f = empty_as_null();
        assert_eq!(f("phone", json!("")).unwrap(), json!(null));
        assert_eq!(f("phone", json!(" ")).unwrap(), json!(" "));
        assert_eq!(f("phone", json!("123")).unwrap(), json!("123"));
    }

    // === parse_number() ===

    #[test]
    fn test_parse_number() {
        let f = parse_number();
        assert_eq!(f("fee", json!("4500")).unwrap(), json!(4500));
        assert_eq!(f("fee", json!(" 12.5 ")).unwrap(), json!(12.5));
        assert_eq!(f("fee", json!("free")).unwrap(), json!("free"));
        assert_eq!(f("fee", json!(30)).unwrap(), json!(30));
    }
}
