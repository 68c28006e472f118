//! Installment billing: admin CRUD plus the paid/unpaid toggle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kud_core::forms::InstallmentForm;
use kud_core::query::newest_first;
use kud_core::{page_size, CoreError, Entity, Installment, Page};
use tracing::info;

use super::ListParams;
use crate::error::ApiResult;
use crate::extract::{AdminSession, JsonBody};
use crate::state::AppState;

/// `GET /api/admin/installments`, newest first.
pub async fn list_installments(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<Installment>>> {
    let mut installments = state.installments.find_all().await?;
    installments.sort_by(newest_first);
    Ok(Json(params.page_of(&installments, page_size::INSTALLMENTS)?))
}

pub async fn create_installment(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(form): JsonBody<InstallmentForm>,
) -> ApiResult<(StatusCode, Json<Installment>)> {
    let installment = state.installments.create(form.validate()?).await?;
    info!(id = %installment.id, "Installment created");
    Ok((StatusCode::CREATED, Json(installment)))
}

pub async fn update_installment(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<InstallmentForm>,
) -> ApiResult<Json<Installment>> {
    let mut installment = form.validate()?;
    installment.set_id(id);
    Ok(Json(state.installments.update(installment).await?))
}

pub async fn delete_installment(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.installments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/installments/{id}/toggle`
pub async fn toggle_installment(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Installment>> {
    let mut installment = state
        .installments
        .find_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::InstallmentNotFound(id.clone()))?;

    installment.status = installment.status.toggled();
    let installment = state.installments.update(installment).await?;
    info!(id = %installment.id, status = installment.status.label(), "Installment toggled");
    Ok(Json(installment))
}
