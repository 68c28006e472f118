//! Dashboard cards for both portals.

use axum::extract::State;
use axum::Json;
use kud_core::session::MemberSummary;
use kud_core::summary::DashboardStats;
use serde::Serialize;

use crate::error::ApiResult;
use crate::extract::{AdminSession, MemberSession};
use crate::state::AppState;

/// `GET /api/admin/dashboard`
pub async fn admin_dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> ApiResult<Json<DashboardStats>> {
    let member_count = state.members.count().await?;
    let applications = state.loan_applications.find_all().await?;
    let savings = state.savings.find_all().await?;
    Ok(Json(DashboardStats::compute(
        member_count,
        &applications,
        &savings,
    )))
}

#[derive(Debug, Serialize)]
pub struct MemberDashboard {
    pub name: String,
    pub summary: Option<MemberSummary>,
}

/// `GET /api/user/dashboard`
pub async fn member_dashboard(MemberSession(current): MemberSession) -> Json<MemberDashboard> {
    Json(MemberDashboard {
        name: current.session.name,
        summary: current.session.member,
    })
}
