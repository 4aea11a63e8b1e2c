//! HTTP surface of the marketplace
//!
//! This module provides a `ServerBuilder` that wires the marketplace and
//! session manager into an axum router:
//! - JSON list endpoints backed by the table engine
//! - Login, logout and registration
//! - Role-specific dashboard pages and moderation actions

pub mod builder;
pub mod extractors;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use extractors::CurrentSession;
pub use handlers::AppState;
pub use router::build_routes;
