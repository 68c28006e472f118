//! # Loans
//!
//! Admin review of loan applications, and the member's application form,
//! installment quote and loan status history.
//!
//! ```text
//! Admin                                   Member
//! ─────                                   ──────
//! GET  /api/admin/loans                   POST /api/user/loans/quote
//! POST /api/admin/loans/{id}/approve      POST /api/user/loans
//! POST /api/admin/loans/{id}/reject       GET  /api/user/loans
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kud_core::forms::{FormValue, LoanApplicationForm};
use kud_core::loan::{compute_installment, LoanQuote, LoanTerms};
use kud_core::money::format_rupiah;
use kud_core::query::newest_first;
use kud_core::summary::LoanSummary;
use kud_core::validation::validate_loan_duration;
use kud_core::{page_size, CoreError, LoanApplication, LoanDecision, Money, Page};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ListParams;
use crate::error::ApiResult;
use crate::extract::{AdminSession, JsonBody, MemberSession};
use crate::state::AppState;

// =============================================================================
// Admin
// =============================================================================

pub async fn list_applications(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<LoanApplication>>> {
    let applications = state.loan_applications.find_all().await?;
    Ok(Json(params.page_of(&applications, page_size::LOAN_APPLICATIONS)?))
}

pub async fn approve_application(
    state: State<AppState>,
    _admin: AdminSession,
    id: Path<String>,
) -> ApiResult<Json<LoanApplication>> {
    decide(state, id, LoanDecision::Approve).await
}

pub async fn reject_application(
    state: State<AppState>,
    _admin: AdminSession,
    id: Path<String>,
) -> ApiResult<Json<LoanApplication>> {
    decide(state, id, LoanDecision::Reject).await
}

async fn decide(
    State(state): State<AppState>,
    Path(id): Path<String>,
    decision: LoanDecision,
) -> ApiResult<Json<LoanApplication>> {
    let mut application = state
        .loan_applications
        .find_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::LoanApplicationNotFound(id.clone()))?;

    application.decide(decision)?;
    let application = state.loan_applications.update(application).await?;
    info!(id = %application.id, status = application.status.label(), "Loan application decided");
    Ok(Json(application))
}

// =============================================================================
// Member
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub amount: FormValue,
    pub duration_months: FormValue,
}

/// Live installment figure under the application form.
///
/// Every field is `null` while the inputs are incomplete or not positive.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub monthly_installment: Option<f64>,
    /// `monthly_installment` with the Rupiah symbol.
    pub display: Option<String>,
    /// Full breakdown, once the duration is one the cooperative offers.
    pub quote: Option<LoanQuote>,
}

/// `POST /api/user/loans/quote`
pub async fn quote(
    _member: MemberSession,
    JsonBody(request): JsonBody<QuoteRequest>,
) -> Json<QuoteResponse> {
    let monthly_installment =
        compute_installment(request.amount.raw(), request.duration_months.raw());
    let quote = request
        .amount
        .to_amount("amount")
        .ok()
        .zip(validate_loan_duration(&request.duration_months.as_text()).ok())
        .and_then(|(principal, months)| LoanTerms::new(principal, months).ok())
        .map(|terms| terms.quote());

    Json(QuoteResponse {
        monthly_installment,
        display: monthly_installment.map(format_rupiah),
        quote,
    })
}

/// `POST /api/user/loans`
///
/// Blank NIK and name fall back to the logged-in member.
pub async fn submit_application(
    State(state): State<AppState>,
    MemberSession(current): MemberSession,
    JsonBody(mut form): JsonBody<LoanApplicationForm>,
) -> ApiResult<(StatusCode, Json<LoanApplication>)> {
    if form.nik.trim().is_empty() {
        form.nik = current.session.nik().unwrap_or_default().to_string();
    }
    if form.name.trim().is_empty() {
        form.name = current.session.name.clone();
    }

    let application = form.validate(state.today())?;
    let application = state.loan_applications.create(application).await?;
    info!(id = %application.id, amount = %application.amount, "Loan application submitted");
    Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Serialize)]
pub struct LoanStatusView {
    pub summary: LoanSummary,
    pub applications: Page<LoanApplication>,
}

/// `GET /api/user/loans`
pub async fn loan_status(
    State(state): State<AppState>,
    MemberSession(current): MemberSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<LoanStatusView>> {
    let nik = current.session.nik().unwrap_or_default();
    let loan_amount = current
        .session
        .member
        .as_ref()
        .map_or(Money::zero(), |m| m.loan_amount);

    let mut applications: Vec<LoanApplication> = state
        .loan_applications
        .find_all()
        .await?
        .into_iter()
        .filter(|a| a.nik == nik)
        .collect();
    applications.sort_by(newest_first);

    let installments = state.installments.find_all().await?;

    Ok(Json(LoanStatusView {
        summary: LoanSummary::compute(loan_amount, nik, &installments),
        applications: params.page_of(&applications, page_size::LOAN_APPLICATIONS)?,
    }))
}
