//! Transaction ledger report and its printable export.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use kud_core::query::matches;
use kud_core::report::{render_print_document, report_title};
use kud_core::validation::validate_search_query;
use kud_core::{page_size, FieldErrors, LedgerTransaction, Page};
use serde::Serialize;
use tracing::debug;

use super::ListParams;
use crate::error::ApiResult;
use crate::extract::AdminSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LedgerReport {
    pub title: String,
    pub transactions: Page<LedgerTransaction>,
}

/// `GET /api/admin/reports?q=&type=&page=`
pub async fn ledger_report(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<LedgerReport>> {
    let ledger = state.ledger.find_all().await?;
    Ok(Json(LedgerReport {
        title: report_title(&params.filter()),
        transactions: params.page_of(&ledger, page_size::LEDGER)?,
    }))
}

/// `GET /api/admin/reports/print?q=&type=`
///
/// Every matching row, unpaginated.
pub async fn print_report(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Html<String>> {
    let search = validate_search_query(params.q.as_deref().unwrap_or_default())
        .map_err(FieldErrors::from)?;
    let filter = params.filter();

    let rows: Vec<LedgerTransaction> = state
        .ledger
        .find_all()
        .await?
        .into_iter()
        .filter(|tx| matches(tx, &search, &filter))
        .collect();

    debug!(rows = rows.len(), "Printing ledger report");
    Ok(Html(render_print_document(&rows, &filter, state.today())))
}
