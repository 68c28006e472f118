//! # Key-Value Store
//!
//! JSON documents in the `kv_store` table, one row per key.
//!
//! ## Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session:<token>        Session          (SessionStore)                 │
//! │  profile:<email>        Profile          (ProfileStore)                 │
//! │  loanApplications       [LoanApplication] (StoredRepository)            │
//! │  savingsTransactions    [SavingsTransaction] (StoredRepository)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing key reads as `None`. A value that does not decode is an
//! error ([`DbError::CorruptValue`]), never an empty default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

pub const SESSION_KEY_PREFIX: &str = "session:";
pub const PROFILE_KEY_PREFIX: &str = "profile:";
pub const LOAN_APPLICATIONS_KEY: &str = "loanApplications";
pub const SAVINGS_TRANSACTIONS_KEY: &str = "savingsTransactions";

/// Handle to the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
}

impl KeyValueStore {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueStore { pool }
    }

    /// Raw text under `key`.
    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        debug!(key = %key, "Reading key");

        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Inserts or overwrites `key`.
    pub async fn set_raw(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key");

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing key");

        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn contains(&self, key: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Decodes the JSON value under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_raw(key).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::corrupt(key, e)),
        }
    }

    /// Encodes `value` as JSON under `key`.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn store() -> KeyValueStore {
        Database::new(DbConfig::in_memory()).await.unwrap().store()
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = store().await;
        assert_eq!(store.get_raw("nothing").await.unwrap(), None);
        let decoded: Option<Vec<u32>> = store.get_json("nothing").await.unwrap();
        assert!(decoded.is_none());
        assert!(!store.contains("nothing").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = store().await;
        store.set_raw("k", "1").await.unwrap();
        store.set_raw("k", "2").await.unwrap();
        assert_eq!(store.get_raw("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_json_values() {
        let store = store().await;
        store.set_json("numbers", &vec![3, 1, 2]).await.unwrap();
        let numbers: Vec<i32> = store.get_json("numbers").await.unwrap().unwrap();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let store = store().await;
        store.set_raw(LOAN_APPLICATIONS_KEY, "{not json").await.unwrap();

        let err = store
            .get_json::<Vec<serde_json::Value>>(LOAN_APPLICATIONS_KEY)
            .await
            .unwrap_err();
        match err {
            DbError::CorruptValue { key, .. } => assert_eq!(key, LOAN_APPLICATIONS_KEY),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store().await;
        store.set_raw("session:abc", "{}").await.unwrap();
        assert!(store.remove("session:abc").await.unwrap());
        assert!(!store.remove("session:abc").await.unwrap());
        assert_eq!(store.get_raw("session:abc").await.unwrap(), None);
    }
}
