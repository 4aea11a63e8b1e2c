//! Per-form validation rules
//!
//! A [`FormRules`] lists, for each field, the filters that normalize its
//! value and the validators that check it. Fields without rules pass
//! through untouched.

use crate::core::error::FieldValidationError;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

type FieldFilter = Arc<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;
type FieldValidator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Filters and validators for a single field
#[derive(Clone, Default)]
pub struct FieldRules {
    filters: Vec<FieldFilter>,
    validators: Vec<FieldValidator>,
}

impl FieldRules {
    /// Add a filter; filters run in insertion order before any validator
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Add a validator; every validator runs and every failure is reported
    pub fn validate<V>(mut self, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }
}

/// Validation rules for a whole form payload
#[derive(Clone, Default)]
pub struct FormRules {
    fields: IndexMap<String, FieldRules>,
}

impl std::fmt::Debug for FormRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRules")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules for one field
    ///
    /// ```rust,ignore
    /// FormRules::new().field("email", |f| f.filter(trim()).validate(required()).validate(email()))
    /// ```
    pub fn field(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(FieldRules) -> FieldRules,
    ) -> Self {
        let rules = self.fields.entry(name.into()).or_default();
        *rules = configure(std::mem::take(rules));
        self
    }

    /// Names of the fields that carry rules, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Run filters then validators over a JSON object payload
    ///
    /// Returns the filtered payload, or every field error found.
    pub fn validate_and_filter(
        &self,
        payload: Value,
    ) -> std::result::Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut object) = payload else {
            return Err(vec![FieldValidationError::new(
                "_payload",
                "expected a JSON object",
            )]);
        };

        let mut errors = Vec::new();

        for (name, rules) in &self.fields {
            let present = object.contains_key(name);
            let mut value = object.remove(name).unwrap_or(Value::Null);

            for filter in &rules.filters {
                match filter(name.as_str(), value.clone()) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError::new(name.as_str(), e.to_string()));
                        break;
                    }
                }
            }

            for validator in &rules.validators {
                if let Err(message) = validator(name.as_str(), &value) {
                    errors.push(FieldValidationError::new(name.as_str(), message));
                }
            }

            if present {
                object.insert(name.clone(), value);
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(object))
        } else {
            Err(errors)
        }
    }
}
