//! Typed error handling for the marketplace
//!
//! This module provides an error hierarchy that lets callers handle failures
//! specifically rather than dealing with generic `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups and state changes on records
//! - [`AuthError`]: login, sessions and authorization
//! - [`ValidationError`]: form input validation
//! - [`RequestError`]: malformed HTTP requests
//! - [`ConfigError`]: configuration and dataset loading
//!
//! # Example
//!
//! ```rust,ignore
//! match market.course("c99").await {
//!     Ok(course) => println!("Found: {}", course.title),
//!     Err(MarketError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("Course {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::config::ConfigError;
use crate::core::auth::Role;
use crate::entities::VendorStatus;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the marketplace
#[derive(Debug)]
pub enum MarketError {
    /// Record lookups and state changes
    Entity(EntityError),

    /// Authentication and authorization
    Auth(AuthError),

    /// Form validation
    Validation(ValidationError),

    /// Malformed requests
    Request(RequestError),

    /// Configuration and dataset loading
    Config(ConfigError),

    /// Storage backend failures
    Storage(String),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Entity(e) => write!(f, "{}", e),
            MarketError::Auth(e) => write!(f, "{}", e),
            MarketError::Validation(e) => write!(f, "{}", e),
            MarketError::Request(e) => write!(f, "{}", e),
            MarketError::Config(e) => write!(f, "{}", e),
            MarketError::Storage(msg) => write!(f, "Storage error: {}", msg),
            MarketError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketError::Entity(e) => Some(e),
            MarketError::Auth(e) => Some(e),
            MarketError::Validation(e) => Some(e),
            MarketError::Request(e) => Some(e),
            MarketError::Config(e) => Some(e),
            MarketError::Storage(_) | MarketError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl MarketError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Entity(e) => e.status_code(),
            MarketError::Auth(e) => e.status_code(),
            MarketError::Validation(e) => e.status_code(),
            MarketError::Request(e) => e.status_code(),
            MarketError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketError::Entity(e) => e.error_code(),
            MarketError::Auth(e) => e.error_code(),
            MarketError::Validation(e) => e.error_code(),
            MarketError::Request(e) => e.error_code(),
            MarketError::Config(_) => "CONFIG_ERROR",
            MarketError::Storage(_) => "STORAGE_ERROR",
            MarketError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            MarketError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({ "entity_type": entity_type, "id": id }))
            }
            MarketError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            MarketError::Auth(AuthError::Forbidden { allowed }) => {
                Some(serde_json::json!({ "allowed_roles": allowed }))
            }
            _ => None,
        }
    }

    pub fn not_found(entity_type: &str, id: &str) -> Self {
        MarketError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for MarketError {
    fn from(err: anyhow::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Internal(format!("JSON error: {}", err))
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups and state changes
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound { entity_type: String, id: String },

    /// Record already exists (duplicate id, email or enrollment)
    AlreadyExists { entity_type: String, key: String },

    /// The record is not in a state that allows the change
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::AlreadyExists { entity_type, key } => {
                write!(f, "{} '{}' already exists", entity_type, key)
            }
            EntityError::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            } => write!(
                f,
                "{} '{}' cannot move from {} to {}",
                entity_type, id, from, to
            ),
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
        }
    }
}

impl From<EntityError> for MarketError {
    fn from(err: EntityError) -> Self {
        MarketError::Entity(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to login, sessions and authorization
#[derive(Debug)]
pub enum AuthError {
    /// Email/password pair does not match any account
    InvalidCredentials,

    /// No session token was presented
    MissingSession,

    /// The token is unknown or has been logged out
    InvalidSession,

    /// The session outlived its configured lifetime
    SessionExpired,

    /// The principal's role is not allowed here
    Forbidden { allowed: Vec<Role> },

    /// A vendor whose application has not been approved
    NotVerified { status: VendorStatus },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::MissingSession => write!(f, "Authentication required"),
            AuthError::InvalidSession => write!(f, "Session is not valid"),
            AuthError::SessionExpired => write!(f, "Session has expired"),
            AuthError::Forbidden { allowed } => {
                let roles: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
                write!(f, "Forbidden: requires one of [{}]", roles.join(", "))
            }
            AuthError::NotVerified { status } => {
                write!(f, "Vendor account is not approved (status: {})", status)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden { .. } | AuthError::NotVerified { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingSession => "MISSING_SESSION",
            AuthError::InvalidSession => "INVALID_SESSION",
            AuthError::SessionExpired => "SESSION_EXPIRED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
            AuthError::NotVerified { .. } => "VENDOR_NOT_VERIFIED",
        }
    }
}

impl From<AuthError> for MarketError {
    fn from(err: AuthError) -> Self {
        MarketError::Auth(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to form validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed validation
    FieldErrors(Vec<FieldValidationError>),

    /// The payload does not have the expected shape
    InvalidPayload { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            ValidationError::InvalidPayload { message } => {
                write!(f, "Invalid payload: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidPayload { .. } => "INVALID_PAYLOAD",
        }
    }
}

impl From<ValidationError> for MarketError {
    fn from(err: ValidationError) -> Self {
        MarketError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to malformed HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Unknown dashboard page or route segment
    UnknownPage { page: String },

    /// Malformed header value
    InvalidHeader { header: String, message: String },

    /// Query string that does not deserialize
    InvalidQuery { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownPage { page } => write!(f, "Unknown page: {}", page),
            RequestError::InvalidHeader { header, message } => {
                write!(f, "Invalid header '{}': {}", header, message)
            }
            RequestError::InvalidQuery { message } => {
                write!(f, "Invalid query string: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::UnknownPage { .. } => StatusCode::NOT_FOUND,
            RequestError::InvalidHeader { .. } | RequestError::InvalidQuery { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::UnknownPage { .. } => "UNKNOWN_PAGE",
            RequestError::InvalidHeader { .. } => "INVALID_HEADER",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

impl From<RequestError> for MarketError {
    fn from(err: RequestError) -> Self {
        MarketError::Request(err)
    }
}

impl From<ConfigError> for MarketError {
    fn from(err: ConfigError) -> Self {
        MarketError::Config(err)
    }
}
