//! # kud-db: Storage Layer for KUD Rukun Tani
//!
//! SQLite through sqlx for what must survive a restart, tokio-locked
//! vectors for what need not, and one [`Repository`] trait over both.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KUD Portal Data Flow                             │
//! │                                                                         │
//! │  axum handler (kud-server)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kud-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Memory<T>     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Stored<T>     │    │ 001_kv_store │  │   │
//! │  │   │ KeyValueStore │    │ Sessions      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (kud.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`store`] - JSON key-value store
//! - [`repository`] - `Repository<T>` and its two implementations
//! - [`session`] - Login sessions and profile settings
//! - [`fixtures`] - Demo records
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kud_db::{Database, DbConfig, StoredRepository, LOAN_APPLICATIONS_KEY};
//!
//! let db = Database::new(DbConfig::new("kud.db")).await?;
//! let applications = StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
//! let pending = applications.find_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{MemoryRepository, Repository, StoredRepository};
pub use session::{ProfileStore, SessionStore};
pub use store::{KeyValueStore, LOAN_APPLICATIONS_KEY, SAVINGS_TRANSACTIONS_KEY};
