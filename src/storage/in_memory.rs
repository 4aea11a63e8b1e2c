//! In-memory implementation of Repository for the seed dataset and tests

use crate::core::record::Record;
use crate::core::store::Repository;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

/// In-memory repository implementation
///
/// Records keep their insertion order, which is the "original order" every
/// listing starts from. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryRepository<T: Record> {
    records: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T: Record> InMemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a repository holding `records` in the given order
    ///
    /// Later records with an id already seen are dropped.
    pub fn from_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut map = IndexMap::new();
        for record in records {
            map.entry(record.id().to_string()).or_insert(record);
        }
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().cloned().collect())
    }

    async fn find(&self, id: &str) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.contains_key(record.id()) {
            return Err(anyhow!(
                "{} '{}' already exists",
                T::resource_name_singular(),
                record.id()
            ));
        }

        records.insert(record.id().to_string(), record.clone());

        Ok(record)
    }

    async fn update(&self, id: &str, record: T) -> Result<T> {
        if record.id() != id {
            return Err(anyhow!(
                "{} id mismatch: path '{}' vs record '{}'",
                T::resource_name_singular(),
                id,
                record.id()
            ));
        }

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = records
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} '{}' not found", T::resource_name_singular(), id))?;

        *slot = record.clone();

        Ok(record)
    }
}
