//! Login sessions
//!
//! A [`Session`] is created at login and destroyed at logout; it is the only
//! way handlers learn who the current principal is.

use crate::core::auth::Role;
use crate::core::error::{AuthError, MarketError};
use crate::core::store::Repository;
use crate::entities::Principal;
use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// An authenticated principal plus its token
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: Uuid,
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.principal.role()
    }

    pub fn principal_id(&self) -> &str {
        &self.principal.profile().id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    principal_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Issues, resolves and revokes sessions
///
/// Only the principal id is stored per token; `resolve` reloads the
/// principal so a session always sees its current state (for example a
/// vendor approved after logging in).
#[derive(Clone)]
pub struct SessionManager {
    principals: Arc<dyn Repository<Principal>>,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(principals: Arc<dyn Repository<Principal>>, ttl: Duration) -> Self {
        Self {
            principals,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Check credentials and open a session
    ///
    /// Emails compare case-insensitively. Unknown email and wrong password
    /// produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, MarketError> {
        let email = email.trim();
        let principal = self
            .principals
            .list()
            .await?
            .into_iter()
            .find(|p| p.email().eq_ignore_ascii_case(email))
            .filter(|p| p.profile().password_matches(password));

        let Some(principal) = principal else {
            tracing::info!(email = %email, "Rejected login attempt");
            return Err(AuthError::InvalidCredentials.into());
        };

        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            MarketError::Internal(format!("session lifetime {} overflows the clock", self.ttl))
        })?;
        let token = Uuid::new_v4();
        let entry = SessionEntry {
            principal_id: principal.profile().id.clone(),
            created_at: now,
            expires_at,
        };

        {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            sessions.insert(token, entry.clone());
        }

        tracing::info!(
            principal = %entry.principal_id,
            role = %principal.role(),
            "Session opened"
        );

        Ok(Session {
            token,
            principal,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
        })
    }

    /// Look up the session for a token
    ///
    /// Expired sessions are removed and reported as `SessionExpired`.
    pub async fn resolve(&self, token: &Uuid) -> Result<Session, MarketError> {
        let entry = {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
            sessions.get(token).cloned()
        };

        let Some(entry) = entry else {
            return Err(AuthError::InvalidSession.into());
        };

        if Utc::now() >= entry.expires_at {
            self.revoke(token)?;
            return Err(AuthError::SessionExpired.into());
        }

        let principal = self
            .principals
            .find(&entry.principal_id)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        Ok(Session {
            token: *token,
            principal,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
        })
    }

    /// Destroy a session; returns whether it existed
    pub fn logout(&self, token: &Uuid) -> Result<bool, MarketError> {
        let existed = self.revoke(token)?;
        if existed {
            tracing::info!(token = %token, "Session closed");
        }
        Ok(existed)
    }

    /// Drop every expired session; returns how many were removed
    pub fn purge_expired(&self) -> Result<usize, MarketError> {
        let now = Utc::now();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        let before = sessions.len();
        sessions.retain(|_, entry| now < entry.expires_at);
        Ok(before - sessions.len())
    }

    /// Sweep expired sessions on a fixed interval until the task is aborted
    ///
    /// Sessions that are never resolved again are only dropped here.
    pub fn spawn_purge_task(&self, every: std::time::Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(std::time::Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match sessions.purge_expired() {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Purged expired sessions"),
                    Err(e) => tracing::warn!(error = %e, "Session purge failed"),
                }
            }
        })
    }

    /// Number of sessions currently stored, expired or not
    pub fn active_count(&self) -> Result<usize, MarketError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(sessions.len())
    }

    fn revoke(&self, token: &Uuid) -> Result<bool, MarketError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        Ok(sessions.remove(token).is_some())
    }
}
