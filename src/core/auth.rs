//! Authorization for the marketplace
//!
//! Every principal carries exactly one [`Role`]. Operations declare an
//! [`AuthPolicy`] which is checked against the role of the current session,
//! or `None` for anonymous callers.

use crate::core::error::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of principal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A seafarer browsing and enrolling in courses
    #[serde(rename = "user")]
    Seafarer,
    /// A training institute publishing courses
    Vendor,
    /// A platform administrator
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Seafarer, Role::Vendor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seafarer => "user",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "seafarer" => Ok(Role::Seafarer),
            "vendor" => Ok(Role::Vendor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any logged-in principal
    Authenticated,

    /// Principal must have one of these roles
    HasRole(Vec<Role>),

    /// Admin only
    AdminOnly,

    /// Combination of policies (AND)
    And(Vec<AuthPolicy>),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if the current role satisfies this policy
    pub fn check(&self, role: Option<Role>) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => role.is_some(),

            AuthPolicy::HasRole(allowed) => role.is_some_and(|r| allowed.contains(&r)),

            AuthPolicy::AdminOnly => role == Some(Role::Admin),

            AuthPolicy::And(policies) => policies.iter().all(|p| p.check(role)),

            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(role)),
        }
    }

    /// Check the policy and explain a denial
    ///
    /// Anonymous callers get `MissingSession`; authenticated callers with
    /// the wrong role get `Forbidden` listing the roles that would pass.
    pub fn require(&self, role: Option<Role>) -> Result<(), AuthError> {
        if self.check(role) {
            return Ok(());
        }
        match role {
            None => Err(AuthError::MissingSession),
            Some(_) => Err(AuthError::Forbidden {
                allowed: self.allowed_roles(),
            }),
        }
    }

    /// Roles that satisfy this policy
    pub fn allowed_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| self.check(Some(*r)))
            .collect()
    }

    /// Parse policy from string (for YAML config)
    ///
    /// `role:` accepts a comma-separated list, e.g. `role:vendor,admin`.
    pub fn parse_policy(s: &str) -> Self {
        match s {
            "public" => AuthPolicy::Public,
            "authenticated" => AuthPolicy::Authenticated,
            "admin_only" => AuthPolicy::AdminOnly,
            s if s.starts_with("role:") => {
                let roles = s["role:".len()..]
                    .split(',')
                    .filter_map(|r| r.parse::<Role>().ok())
                    .collect();
                AuthPolicy::HasRole(roles)
            }
            _ => AuthPolicy::Authenticated, // Default
        }
    }
}
