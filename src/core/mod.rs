//! Core module containing the table engine and the traits around it

pub mod auth;
pub mod error;
pub mod field;
pub mod query;
pub mod record;
pub mod store;
pub mod table;
pub mod validation;

pub use auth::{AuthPolicy, Role};
pub use error::{ErrorResponse, MarketError};
pub use field::{FieldFormat, FieldValue};
pub use query::{
    FilterValue, Filters, PaginatedResponse, PaginationMeta, QueryParams, QueryState,
    SortDirection, SortSpec,
};
pub use record::Record;
pub use store::Repository;
pub use table::{Column, TableView, ViewWindow};
