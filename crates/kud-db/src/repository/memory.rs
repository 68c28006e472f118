//! Process-lifetime repository.
//!
//! Members, the member savings log, installments and the transaction
//! ledger live here. Everything is gone after a restart, which is how
//! the portal has always treated these screens.

use async_trait::async_trait;
use kud_core::types::Entity;
use tokio::sync::RwLock;
use tracing::debug;

use super::{insert_new, remove_existing, replace_existing, Repository};
use crate::error::DbResult;

/// `Vec<T>` behind a tokio `RwLock`.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        MemoryRepository {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Repository preloaded with `records`, in the given order.
    pub fn with_records(records: Vec<T>) -> Self {
        MemoryRepository {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> DbResult<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, record: T) -> DbResult<T> {
        let mut records = self.records.write().await;
        let created = insert_new(&mut *records, record);
        debug!(kind = T::KIND, id = %created.id(), "Created record");
        Ok(created)
    }

    async fn update(&self, record: T) -> DbResult<T> {
        let mut records = self.records.write().await;
        let updated = replace_existing(records.as_mut_slice(), record)?;
        debug!(kind = T::KIND, id = %updated.id(), "Updated record");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> DbResult<T> {
        let mut records = self.records.write().await;
        let removed = remove_existing(&mut *records, id)?;
        debug!(kind = T::KIND, id = %id, "Deleted record");
        Ok(removed)
    }

    async fn count(&self) -> DbResult<usize> {
        Ok(self.records.read().await.len())
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
