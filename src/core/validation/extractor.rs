//! Axum extractor for validated forms
//!
//! This module provides the `Validated<T>` extractor that filters and
//! validates request payloads before deserializing them into typed forms.

use super::rules::FormRules;
use crate::core::error::{MarketError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Trait for forms that declare validation rules
pub trait ValidatedForm: DeserializeOwned {
    /// Filters and validators applied to the raw JSON payload
    fn rules() -> FormRules;

    /// Run the rules over a payload and deserialize the result
    fn from_payload(payload: Value) -> Result<Self, MarketError> {
        let filtered = Self::rules()
            .validate_and_filter(payload)
            .map_err(ValidationError::FieldErrors)?;

        serde_json::from_value(filtered).map_err(|e| {
            MarketError::Validation(ValidationError::InvalidPayload {
                message: e.to_string(),
            })
        })
    }
}

/// Axum extractor that validates and filters form data
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn register_seafarer(
///     State(state): State<AppState>,
///     Validated(form): Validated<SeafarerRegistration>,
/// ) -> Result<Json<Principal>, MarketError> {
///     // form is already filtered, validated and typed
/// }
/// ```
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner form
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedForm + Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            MarketError::Validation(ValidationError::InvalidPayload {
                message: e.body_text(),
            })
        })?;

        T::from_payload(payload).map(Validated)
    }
}
