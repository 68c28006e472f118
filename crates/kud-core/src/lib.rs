//! # kud-core: Pure Business Logic for KUD Rukun Tani
//!
//! This crate holds every rule of the cooperative portal that can be
//! expressed without touching storage or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KUD Rukun Tani Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Admin portal          Member portal                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kud-server (axum handlers)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ kud-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  loan   │ │  query  │ │ session │ │ report  │  │   │
//! │  │   │ Rupiah  │ │ flat    │ │ search  │ │ roles   │ │ print   │  │   │
//! │  │   │ format  │ │ 1.5%/mo │ │ paging  │ │ gating  │ │ HTML    │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                kud-db (Storage Layer)                           │   │
//! │  │        Repositories, key-value store, mock fixtures             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Member, LoanApplication, Installment, ...)
//! - [`money`] - Integer Rupiah and the two Indonesian formatters
//! - [`loan`] - Flat-rate installment calculator
//! - [`query`] - Generic search/filter/paginate engine and list view
//! - [`session`] - Roles, fixed credentials, route gating
//! - [`forms`] - Submitted forms and their field validation
//! - [`summary`] - Dashboard and portfolio totals
//! - [`report`] - Printable transaction report
//! - [`dates`] - Indonesian calendar names
//! - [`validation`] - Single-field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kud_core::loan::LoanTerms;
//! use kud_core::money::{format_rupiah, Money};
//!
//! let terms = LoanTerms::new(Money::from_rupiah(5_000_000), 12).unwrap();
//!
//! assert_eq!(terms.total_interest(), 900_000.0);
//! assert_eq!(format_rupiah(terms.monthly_installment()), "Rp 491.666,67");
//! assert_eq!(terms.monthly_installment_rounded().rupiah(), 491_667);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dates;
pub mod error;
pub mod forms;
pub mod loan;
pub mod money;
pub mod query;
pub mod report;
pub mod session;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::Money;
pub use query::{CategoryFilter, ListView, Page, Searchable};
pub use session::{Role, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat monthly interest charged on every loan, in basis points (1.5%).
pub const MONTHLY_INTEREST_BPS: u32 = 150;

/// Repayment periods a member may pick on the application form.
pub const LOAN_DURATIONS: [u32; 5] = [3, 6, 12, 24, 36];

/// Largest amount any money field accepts, in Rupiah (Rp 1 trillion).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Rows per page for each list screen.
pub mod page_size {
    pub const MEMBERS: usize = 9;
    pub const MEMBER_SAVINGS: usize = 6;
    pub const LOAN_APPLICATIONS: usize = 9;
    pub const INSTALLMENTS: usize = 9;
    pub const SAVINGS: usize = 9;
    pub const LEDGER: usize = 10;
}
