//! Field value types, ordering and format validation

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
///
/// This is the projection type every record exposes to the table engine.
/// `Null` stands for an undefined projection: it never matches a search or
/// a filter, and it sorts below every other value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Get the value as a calendar date if possible
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::DateTime(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Build a field value from a JSON value (query strings, form payloads)
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            other => FieldValue::String(other.to_string()),
        }
    }

    /// The string projection used by free-text search
    ///
    /// Returns `None` for `Null`, so undefined fields never match.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Uuid(u) => Some(u.to_string()),
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Null => None,
        }
    }

    /// Exact-match equality used by filters
    ///
    /// Numbers compare numerically across `Integer`/`Float`; everything else
    /// compares through its canonical text, so a date field matches the
    /// string `"2024-08-01"`. `Null` never matches anything.
    pub fn matches(&self, other: &FieldValue) -> bool {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a == b;
        }
        match (self.search_text(), other.search_text()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Natural ordering of the value's semantic type
    ///
    /// Strings are lexicographic, numbers numeric, dates chronological.
    /// `Null` is the lowest value. Values of unrelated types order by type
    /// alone, which keeps this a total order over mixed columns.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::DateTime(b)) => {
                a.and_time(NaiveTime::MIN).and_utc().cmp(b)
            }
            (FieldValue::DateTime(a), FieldValue::Date(b)) => {
                a.cmp(&b.and_time(NaiveTime::MIN).and_utc())
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.type_rank().cmp(&other.type_rank()),
            },
        }
    }

    /// Compare against a range bound
    ///
    /// Date bounds arrive from JSON as `"YYYY-MM-DD"` strings, so a string
    /// bound is read as a date when this value is a date or datetime.
    /// Everything else defers to [`FieldValue::compare`].
    pub fn compare_to_bound(&self, bound: &FieldValue) -> Ordering {
        match (self, bound) {
            (FieldValue::Date(_) | FieldValue::DateTime(_), FieldValue::String(s)) => {
                match parse_iso_date(s) {
                    Some(day) => self.compare(&FieldValue::Date(day)),
                    None => self.compare(bound),
                }
            }
            _ => self.compare(bound),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::Date(_) | FieldValue::DateTime(_) => 3,
            FieldValue::Uuid(_) => 4,
            FieldValue::String(_) => 5,
        }
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Field format validators for form input
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Url,
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a field value against this format
    pub fn validate(&self, value: &FieldValue) -> bool {
        let string_value = match value.as_string() {
            Some(s) => s,
            None => return false,
        };

        self.validate_str(string_value)
    }

    /// Validate a raw string against this format
    pub fn validate_str(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Url => Self::is_valid_url(value),
            FieldFormat::Phone => Self::is_valid_phone(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        regex.is_match(email)
    }

    fn is_valid_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());
        regex.is_match(url)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            // 8 to 15 digits (E.164), optional leading +
            Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap()
        });
        // Seed data writes numbers like "+1 234 567 890"
        let compact: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        regex.is_match(&compact)
    }
}
