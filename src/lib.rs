//! # Coursedeck
//!
//! The core of a maritime course marketplace: seafarers browse and enroll in
//! certification courses, training institutes publish them, and admins
//! moderate both.
//!
//! ## Features
//!
//! - **Table engine**: search, filter, sort and paginate any [`Record`](core::Record) collection
//! - **Repositories**: async `Repository` trait with an in-memory store
//! - **Sessions**: UUID bearer tokens with a configurable lifetime
//! - **Closed roles**: `Principal = Seafarer | Vendor | Admin`
//! - **Validated forms**: filters and validators run before deserialization
//! - **HTTP API**: axum routes with typed JSON errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coursedeck::prelude::*;
//!
//! let market = Marketplace::from_dataset(Dataset::embedded()?, TableConfig::default());
//!
//! let params = QueryParams {
//!     search: Some("fire".into()),
//!     sort: Some("fee:asc".into()),
//!     ..Default::default()
//! };
//! let page = market.catalog(&params).await?;
//! println!("{} of {} courses", page.data.len(), page.pagination.total);
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod market;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Table engine ===
    pub use crate::core::{
        auth::{AuthPolicy, Role},
        error::{AuthError, EntityError, MarketError, RequestError, ValidationError},
        field::{FieldFormat, FieldValue},
        query::{
            FilterValue, Filters, PaginatedResponse, PaginationMeta, QueryParams, QueryState,
            SortDirection, SortSpec,
        },
        record::Record,
        store::Repository,
        table::{Column, TableView, ViewWindow, paginate},
        validation::{FormRules, Validated, ValidatedForm},
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Domain ===
    pub use crate::entities::{
        Course, CourseMode, CourseStatus, Enrollment, Principal, Profile, Vendor, VendorStatus,
    };
    pub use crate::market::{
        DashboardPage, DashboardView, Marketplace, Session, SessionManager, forms, tables,
    };

    // === Storage ===
    pub use crate::storage::{Dataset, InMemoryRepository};

    // === Config ===
    pub use crate::config::{MarketConfig, TableConfig};

    // === Server ===
    pub use crate::server::{AppState, CurrentSession, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
