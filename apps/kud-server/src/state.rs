//! # Application State
//!
//! Everything a handler can reach, cloned into each request by axum.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │  ├── db                 Database (pool, health)                         │
//! │  ├── sessions/profiles  kv_store backed                                 │
//! │  ├── members            Memory   ┐                                      │
//! │  ├── savings_entries    Memory   │ rebuilt from fixtures on start       │
//! │  ├── installments       Memory   │                                      │
//! │  ├── ledger             Memory   ┘                                      │
//! │  ├── loan_applications  Stored   ┐ kv_store arrays, survive restarts    │
//! │  └── savings            Stored   ┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use kud_core::types::{
    Entity, Installment, LedgerTransaction, LoanApplication, Member, MemberSavingsEntry,
    SavingsTransaction,
};
use kud_db::{
    fixtures, Database, DbResult, MemoryRepository, ProfileStore, Repository, SessionStore,
    StoredRepository, LOAN_APPLICATIONS_KEY, SAVINGS_TRANSACTIONS_KEY,
};
use tracing::info;

/// Source of "today" for new records and printed reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local calendar date.
    System,
    /// Always the given date.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => chrono::Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub profiles: ProfileStore,
    pub members: Arc<dyn Repository<Member>>,
    pub savings_entries: Arc<dyn Repository<MemberSavingsEntry>>,
    pub loan_applications: Arc<dyn Repository<LoanApplication>>,
    pub installments: Arc<dyn Repository<Installment>>,
    pub savings: Arc<dyn Repository<SavingsTransaction>>,
    pub ledger: Arc<dyn Repository<LedgerTransaction>>,
    pub clock: Clock,
}

impl AppState {
    /// Wires repositories over `db`.
    ///
    /// With `seed_fixtures`, the in-memory collections start with the demo
    /// records and the stored ones are seeded if they were never written.
    pub async fn new(db: Database, seed_fixtures: bool) -> DbResult<Self> {
        let loan_applications: StoredRepository<LoanApplication> =
            StoredRepository::new(db.store(), LOAN_APPLICATIONS_KEY);
        let savings: StoredRepository<SavingsTransaction> =
            StoredRepository::new(db.store(), SAVINGS_TRANSACTIONS_KEY);

        if seed_fixtures {
            loan_applications
                .seed_if_absent(&fixtures::loan_applications())
                .await?;
            savings
                .seed_if_absent(&fixtures::savings_transactions())
                .await?;
        }

        let state = AppState {
            sessions: db.sessions(),
            profiles: db.profiles(),
            members: Arc::new(seeded(seed_fixtures, fixtures::members)),
            savings_entries: Arc::new(seeded(seed_fixtures, fixtures::member_savings_entries)),
            installments: Arc::new(seeded(seed_fixtures, fixtures::installments)),
            ledger: Arc::new(seeded(seed_fixtures, fixtures::ledger_transactions)),
            loan_applications: Arc::new(loan_applications),
            savings: Arc::new(savings),
            db,
            clock: Clock::System,
        };

        info!(seed_fixtures, "Application state ready");
        Ok(state)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

fn seeded<T: Entity>(seed: bool, records: fn() -> Vec<T>) -> MemoryRepository<T> {
    if seed {
        MemoryRepository::with_records(records())
    } else {
        MemoryRepository::new()
    }
}
