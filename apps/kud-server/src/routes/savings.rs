//! Savings deposits (admin) and the member's savings list.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use kud_core::forms::SavingsDepositForm;
use kud_core::query::newest_first;
use kud_core::summary::SavingsSummary;
use kud_core::{page_size, Page, SavingsTransaction};
use serde::Serialize;
use tracing::info;

use super::ListParams;
use crate::error::ApiResult;
use crate::extract::{AdminSession, JsonBody, MemberSession};
use crate::state::AppState;

/// `POST /api/admin/savings`
///
/// Recorded as completed on today's date.
pub async fn record_deposit(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(form): JsonBody<SavingsDepositForm>,
) -> ApiResult<(StatusCode, Json<SavingsTransaction>)> {
    let deposit = form.validate(state.today())?;
    let deposit = state.savings.create(deposit).await?;
    info!(id = %deposit.id, kind = deposit.kind.label(), amount = %deposit.amount, "Savings deposit recorded");
    Ok((StatusCode::CREATED, Json(deposit)))
}

#[derive(Debug, Serialize)]
pub struct SavingsView {
    pub summary: SavingsSummary,
    pub transactions: Page<SavingsTransaction>,
}

/// `GET /api/user/savings`
///
/// The summary covers all of the member's transactions, not just the page.
pub async fn member_savings(
    State(state): State<AppState>,
    MemberSession(current): MemberSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<SavingsView>> {
    let nik = current.session.nik().unwrap_or_default();
    let mut transactions: Vec<SavingsTransaction> = state
        .savings
        .find_all()
        .await?
        .into_iter()
        .filter(|t| t.nik == nik)
        .collect();
    transactions.sort_by(newest_first);

    Ok(Json(SavingsView {
        summary: SavingsSummary::from_transactions(&transactions),
        transactions: params.page_of(&transactions, page_size::SAVINGS)?,
    }))
}
