//! # Route Handlers
//!
//! One module per portal screen. Handlers are thin: extract, validate
//! through kud-core forms, call a repository, shape the response.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /api/auth/*          auth.rs          login, logout, register, session │
//! │  /api/admin/*         AdminSession     dashboard, members, loans,       │
//! │                                        installments, savings, reports,  │
//! │                                        profile                          │
//! │  /api/user/*          MemberSession    dashboard, loans, savings,       │
//! │                                        profile                          │
//! │  /api/health          health.rs        no session                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod installments;
pub mod loans;
pub mod members;
pub mod profile;
pub mod reports;
pub mod savings;

use kud_core::query::query;
use kud_core::validation::validate_search_query;
use kud_core::{CategoryFilter, FieldErrors, Page, Searchable};
use serde::Deserialize;

/// `?q=&page=&type=` on every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub q: Option<String>,
    pub page: Option<usize>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListParams {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_param(self.kind.as_deref())
    }

    /// Runs the list query over `records` in their current order.
    pub fn page_of<T: Searchable + Clone>(
        &self,
        records: &[T],
        page_size: usize,
    ) -> Result<Page<T>, FieldErrors> {
        let search = validate_search_query(self.q.as_deref().unwrap_or_default())?;
        Ok(query(
            records,
            &search,
            &self.filter(),
            page_size,
            self.page.unwrap_or(1),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kud_db::fixtures;

    #[test]
    fn test_defaults_to_first_page_of_everything() {
        let page = ListParams::default()
            .page_of(&fixtures::members(), 9)
            .unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_items, 9);
    }

    #[test]
    fn test_type_filter_and_overlong_search() {
        let params = ListParams {
            kind: Some("Pinjaman".to_string()),
            ..Default::default()
        };
        let page = params.page_of(&fixtures::ledger_transactions(), 10).unwrap();
        assert!(page.rows.iter().all(|tx| tx.kind.label() == "Pinjaman"));

        let params = ListParams {
            q: Some("x".repeat(101)),
            ..Default::default()
        };
        let errors = params.page_of(&fixtures::members(), 9).unwrap_err();
        assert!(errors.has("q"));
    }
}
