//! Axum extractors for the current session and table queries
//!
//! Clients present the token returned by `/auth/login` as
//! `Authorization: Bearer <token>`.

use crate::core::error::{AuthError, MarketError, RequestError};
use crate::core::query::QueryParams;
use crate::market::Session;
use crate::server::handlers::AppState;
use axum::extract::{FromRequestParts, Query};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

/// The session behind the request's bearer token
///
/// Rejects with `MissingSession` when no token is sent and with
/// `InvalidSession`/`SessionExpired` when the token does not resolve.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl std::ops::Deref for CurrentSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = MarketError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or(AuthError::MissingSession)?;
        let session = state.sessions.resolve(&token).await?;
        Ok(CurrentSession(session))
    }
}

/// Table query parameters (`page`, `limit`, `search`, `filter`, `sort`)
///
/// Rejects with `InvalidQuery` so a bad query string renders as the usual
/// JSON error body.
#[derive(Debug, Clone, Default)]
pub struct TableQuery(pub QueryParams);

impl<S: Send + Sync> FromRequestParts<S> for TableQuery {
    type Rejection = MarketError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<QueryParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| RequestError::InvalidQuery {
                message: rejection.body_text(),
            })?;
        Ok(TableQuery(params))
    }
}

/// Read the session token from the `Authorization` header
///
/// Returns `Ok(None)` when the header is absent.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<Uuid>, RequestError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let invalid = |message: &str| RequestError::InvalidHeader {
        header: AUTHORIZATION.to_string(),
        message: message.to_string(),
    };

    let value = value
        .to_str()
        .map_err(|_| invalid("header is not valid ASCII"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| invalid("expected 'Bearer <token>'"))?;

    Uuid::parse_str(token.trim())
        .map(Some)
        .map_err(|_| invalid("token is not a UUID"))
}
