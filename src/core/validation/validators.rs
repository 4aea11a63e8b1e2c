//! Reusable field validators
//!
//! A validator inspects one field of a form payload and returns a
//! human-readable message on failure. Validators other than `required`
//! let missing or mistyped values through so that each failure is reported
//! by exactly one rule.

use crate::core::field::FieldFormat;
use serde_json::Value;

/// Validator: field is present, not null and not an empty string
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.is_empty() => Err(format!("'{}' is required", field)),
        _ => Ok(()),
    }
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num <= 0.0 {
                Err(format!("'{}' must be positive (value: {})", field, num))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string length must be within range (in characters)
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(format!(
                    "'{}' must be at least {} characters (currently: {})",
                    field, min, len
                ))
            } else if len > max {
                Err(format!(
                    "'{}' must not exceed {} characters (currently: {})",
                    field, max, len
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num > max {
                Err(format!("'{}' must not exceed {} (value: {})", field, max, num))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.iter().any(|a| a == s) {
                Err(format!(
                    "'{}' must be one of {:?} (value: {})",
                    field, allowed, s
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            match chrono::NaiveDate::parse_from_str(s, format) {
                Ok(_) => Ok(()),
                Err(_) => Err(format!(
                    "'{}' must use the format {} (value: {})",
                    field, format, s
                )),
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must be an email address
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    format_of(FieldFormat::Email, "an email address")
}

/// Validator: string must be a phone number
pub fn phone() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    format_of(FieldFormat::Phone, "a phone number")
}

/// Validator: string must be an http(s) URL
pub fn url() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    format_of(FieldFormat::Url, "a URL")
}

fn format_of(
    expected: FieldFormat,
    label: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !expected.validate_str(s) => {
            Err(format!("'{}' must be {} (value: {})", field, label, s))
        }
        _ => Ok(()),
    }
}
