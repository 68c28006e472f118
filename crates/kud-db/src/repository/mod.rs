//! # Repository Module
//!
//! One CRUD interface over every record type of the portal.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Implementations                           │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.members.create(member)                                  │
//! │       ▼                                                                 │
//! │  dyn Repository<T>                                                     │
//! │  ├── find_all / find_by_id / count                                     │
//! │  ├── create   (mints id, prepends)                                     │
//! │  ├── update   (replace in place)                                       │
//! │  └── delete                                                            │
//! │       │                                                                 │
//! │       ├──► MemoryRepository<T>  ← tokio RwLock<Vec<T>>, lost on restart│
//! │       │    members, savings log, installments, ledger                  │
//! │       │                                                                 │
//! │       └──► StoredRepository<T>  ← JSON array under one kv_store key    │
//! │            loanApplications, savingsTransactions                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collections keep newest-first order: `create` inserts at the front.
//!
//! ## Available Repositories
//!
//! - [`MemoryRepository`] - process-lifetime collections
//! - [`StoredRepository`] - collections that survive restarts

pub mod memory;
pub mod stored;

pub use memory::MemoryRepository;
pub use stored::StoredRepository;

use async_trait::async_trait;
use kud_core::types::Entity;

use crate::error::{DbError, DbResult};

/// CRUD access to one record type.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Every record, newest first.
    async fn find_all(&self) -> DbResult<Vec<T>>;

    async fn find_by_id(&self, id: &str) -> DbResult<Option<T>>;

    /// Assigns a fresh id (the incoming one is ignored) and stores the
    /// record at the front. Returns the stored record.
    async fn create(&self, record: T) -> DbResult<T>;

    /// Replaces the record with the same id, keeping its position.
    async fn update(&self, record: T) -> DbResult<T>;

    /// Removes and returns the record.
    async fn delete(&self, id: &str) -> DbResult<T>;

    async fn count(&self) -> DbResult<usize> {
        Ok(self.find_all().await?.len())
    }
}

// =============================================================================
// Shared collection mutations
// =============================================================================

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mints an id for `record` and puts it at the front of `records`.
pub(crate) fn insert_new<T: Entity>(records: &mut Vec<T>, mut record: T) -> T {
    let id = T::ID_SCHEME.next_id(records.iter().map(|r| r.id()), now_millis());
    record.set_id(id);
    records.insert(0, record.clone());
    record
}

pub(crate) fn replace_existing<T: Entity>(records: &mut [T], record: T) -> DbResult<T> {
    let slot = records
        .iter_mut()
        .find(|r| r.id() == record.id())
        .ok_or_else(|| DbError::not_found(T::KIND, record.id()))?;
    *slot = record.clone();
    Ok(record)
}

pub(crate) fn remove_existing<T: Entity>(records: &mut Vec<T>, id: &str) -> DbResult<T> {
    let index = records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| DbError::not_found(T::KIND, id))?;
    Ok(records.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kud_core::money::Money;
    use kud_core::types::{Installment, InstallmentStatus};

    fn installment(id: &str) -> Installment {
        Installment {
            id: id.to_string(),
            nik: "25225".to_string(),
            name: "Christine Brooks".to_string(),
            loan_amount: Money::from_rupiah(5_000_000),
            installment_amount: Money::from_rupiah(450_000),
            month: "Maret 2024".to_string(),
            status: InstallmentStatus::Unpaid,
        }
    }

    #[test]
    fn test_insert_new_mints_next_id_at_front() {
        let mut records = vec![installment("INS00002"), installment("INS00009")];
        let created = insert_new(&mut records, installment("ignored"));
        assert_eq!(created.id, "INS00010");
        assert_eq!(records[0].id, "INS00010");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_replace_and_remove_missing() {
        let mut records = vec![installment("INS00001")];
        assert!(matches!(
            replace_existing(&mut records, installment("INS00404")),
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            remove_existing(&mut records, "INS00404"),
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(records.len(), 1);
    }
}
