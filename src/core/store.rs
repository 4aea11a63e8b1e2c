//! Repository trait: the data-source seam behind every listing
//!
//! Views never touch the seed collections directly; they go through a
//! `Repository`, so the in-memory store can be replaced by a real backend
//! without changing view logic.

use crate::core::query::{Filters, matches_filters};
use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;

/// Storage-agnostic access to one record type
///
/// `list` returns records in the collection's original order; the table
/// engine relies on that order for stable sorting.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// List all records in original order
    async fn list(&self) -> Result<Vec<T>>;

    /// Find a record by id
    async fn find(&self, id: &str) -> Result<Option<T>>;

    /// List records satisfying every filter, in original order
    ///
    /// Filters are matched against `Record::field_value`.
    async fn filter(&self, filters: &Filters) -> Result<Vec<T>> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| matches_filters(record, filters))
            .collect())
    }

    /// Insert a new record; fails if the id already exists
    async fn insert(&self, record: T) -> Result<T>;

    /// Replace an existing record; fails if the id is unknown
    async fn update(&self, id: &str, record: T) -> Result<T>;
}
