//! Repository persisted as one JSON array in the key-value store.
//!
//! Loan applications and savings transactions survive restarts this way.
//! Every mutation is a read-modify-write of the whole array, serialized
//! by a per-repository mutex.

use std::marker::PhantomData;

use async_trait::async_trait;
use kud_core::types::Entity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{insert_new, remove_existing, replace_existing, Repository};
use crate::error::DbResult;
use crate::store::KeyValueStore;

pub struct StoredRepository<T> {
    store: KeyValueStore,
    key: &'static str,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> StoredRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    pub fn new(store: KeyValueStore, key: &'static str) -> Self {
        StoredRepository {
            store,
            key,
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Writes `records` only when the key has never been written.
    ///
    /// Returns whether anything was written.
    pub async fn seed_if_absent(&self, records: &[T]) -> DbResult<bool> {
        let _guard = self.write_lock.lock().await;
        if self.store.contains(self.key).await? {
            debug!(key = self.key, "Seed skipped, key present");
            return Ok(false);
        }
        self.store.set_json(self.key, records).await?;
        info!(key = self.key, count = records.len(), "Seeded stored collection");
        Ok(true)
    }

    async fn load(&self) -> DbResult<Vec<T>> {
        Ok(self.store.get_json::<Vec<T>>(self.key).await?.unwrap_or_default())
    }

    async fn save(&self, records: &[T]) -> DbResult<()> {
        self.store.set_json(self.key, records).await
    }
}

#[async_trait]
impl<T> Repository<T> for StoredRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn find_all(&self) -> DbResult<Vec<T>> {
        self.load().await
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<T>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    async fn create(&self, record: T) -> DbResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let created = insert_new(&mut records, record);
        self.save(&records).await?;
        debug!(key = self.key, id = %created.id(), "Created stored record");
        Ok(created)
    }

    async fn update(&self, record: T) -> DbResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let updated = replace_existing(&mut records, record)?;
        self.save(&records).await?;
        debug!(key = self.key, id = %updated.id(), "Updated stored record");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> DbResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let removed = remove_existing(&mut records, id)?;
        self.save(&records).await?;
        debug!(key = self.key, id = %id, "Deleted stored record");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::store::{LOAN_APPLICATIONS_KEY, SAVINGS_TRANSACTIONS_KEY};
    use chrono::NaiveDate;
    use kud_core::money::Money;
    use kud_core::types::{
        LoanApplication, LoanStatus, SavingsKind, SavingsStatus, SavingsTransaction,
    };

    fn application(id: &str, amount: i64) -> LoanApplication {
        LoanApplication {
            id: id.to_string(),
            nik: "3214876512345679".to_string(),
            name: "Maemunah".to_string(),
            amount: Money::from_rupiah(amount),
            duration_months: 12,
            submitted_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: LoanStatus::Pending,
        }
    }

    fn deposit(id: &str) -> SavingsTransaction {
        SavingsTransaction {
            id: id.to_string(),
            nik: "3214876512345679".to_string(),
            name: "Maemunah".to_string(),
            amount: Money::from_rupiah(50_000),
            kind: SavingsKind::Voluntary,
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            status: SavingsStatus::Completed,
        }
    }

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_absent_key_reads_empty() {
        let db = database().await;
        let repo: StoredRepository<LoanApplication> =
            StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        assert!(repo.find_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_records_survive_a_new_handle() {
        let db = database().await;
        let repo = StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        let created = repo.create(application("", 5_000_000)).await.unwrap();
        assert!(!created.id.is_empty());

        // Same database, fresh repository: the array was persisted.
        let reopened: StoredRepository<LoanApplication> =
            StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        let all = reopened.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], created);
    }

    #[tokio::test]
    async fn test_timestamp_ids_stay_unique() {
        let db = database().await;
        let repo = StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        let first = repo.create(application("", 1_000_000)).await.unwrap();
        let second = repo.create(application("", 2_000_000)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(repo.find_all().await.unwrap()[0].id, second.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = database().await;
        let repo = StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        let mut created = repo.create(application("", 3_000_000)).await.unwrap();

        created.status = LoanStatus::Approved;
        repo.update(created.clone()).await.unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.status, LoanStatus::Approved);

        repo.delete(&created.id).await.unwrap();
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_seed_if_absent_runs_once() {
        let db = database().await;
        let repo = StoredRepository::new(db.store(), SAVINGS_TRANSACTIONS_KEY);

        assert!(repo.seed_if_absent(&[deposit("2"), deposit("1")]).await.unwrap());
        assert!(!repo.seed_if_absent(&[deposit("9")]).await.unwrap());

        let created = repo.create(deposit("")).await.unwrap();
        assert_eq!(created.id, "3");
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_array_is_an_error() {
        let db = database().await;
        db.store()
            .set_raw(SAVINGS_TRANSACTIONS_KEY, "[{\"id\": 1}]")
            .await
            .unwrap();
        let repo: StoredRepository<SavingsTransaction> =
            StoredRepository::new(db.store(), SAVINGS_TRANSACTIONS_KEY);
        assert!(matches!(
            repo.find_all().await,
            Err(DbError::CorruptValue { .. })
        ));
    }
}
