//! # Member Management
//!
//! Admin CRUD over members and each member's savings log.
//!
//! ```text
//! GET    /api/admin/members                         page of 9
//! POST   /api/admin/members
//! GET    /api/admin/members/{id}
//! PUT    /api/admin/members/{id}
//! DELETE /api/admin/members/{id}
//! GET    /api/admin/members/{id}/savings            page of 6, newest first
//! POST   /api/admin/members/{id}/savings
//! PUT    /api/admin/members/{id}/savings/{entry_id}
//! DELETE /api/admin/members/{id}/savings/{entry_id}
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kud_core::forms::{MemberForm, MemberSavingsEntryForm};
use kud_core::query::newest_first;
use kud_core::{page_size, CoreError, Entity, Member, MemberSavingsEntry, Page};
use serde::Serialize;
use tracing::info;

use super::ListParams;
use crate::error::{ApiError, ApiResult};
use crate::extract::{AdminSession, JsonBody};
use crate::state::AppState;

pub async fn list_members(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<Member>>> {
    let members = state.members.find_all().await?;
    Ok(Json(params.page_of(&members, page_size::MEMBERS)?))
}

pub async fn create_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(form): JsonBody<MemberForm>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    let member = form.validate(state.today())?;
    let member = state.members.create(member).await?;
    info!(id = %member.id, "Member created");
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Member>> {
    Ok(Json(find_member(&state, &id).await?))
}

pub async fn update_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<MemberForm>,
) -> ApiResult<Json<Member>> {
    let current = find_member(&state, &id).await?;
    let mut member = form.validate(current.joined_on)?;
    member.set_id(id);
    Ok(Json(state.members.update(member).await?))
}

pub async fn delete_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let member = state.members.delete(&id).await?;
    info!(id = %member.id, "Member deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_member(state: &AppState, id: &str) -> ApiResult<Member> {
    state
        .members
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::MemberNotFound(id.to_string()).into())
}

// =============================================================================
// Savings Log
// =============================================================================

/// Member header plus one page of their log.
#[derive(Debug, Serialize)]
pub struct SavingsLog {
    pub member: Member,
    pub entries: Page<MemberSavingsEntry>,
}

pub async fn list_savings_entries(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<SavingsLog>> {
    let member = find_member(&state, &id).await?;
    let mut entries: Vec<MemberSavingsEntry> = state
        .savings_entries
        .find_all()
        .await?
        .into_iter()
        .filter(|e| e.member_id == member.id)
        .collect();
    entries.sort_by(newest_first);

    Ok(Json(SavingsLog {
        entries: params.page_of(&entries, page_size::MEMBER_SAVINGS)?,
        member,
    }))
}

pub async fn create_savings_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<MemberSavingsEntryForm>,
) -> ApiResult<(StatusCode, Json<MemberSavingsEntry>)> {
    let member = find_member(&state, &id).await?;
    let entry = form.validate(&member.id)?;
    let entry = state.savings_entries.create(entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_savings_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path((id, entry_id)): Path<(String, String)>,
    JsonBody(form): JsonBody<MemberSavingsEntryForm>,
) -> ApiResult<Json<MemberSavingsEntry>> {
    find_entry(&state, &id, &entry_id).await?;
    let mut entry = form.validate(&id)?;
    entry.set_id(entry_id);
    Ok(Json(state.savings_entries.update(entry).await?))
}

pub async fn delete_savings_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path((id, entry_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    find_entry(&state, &id, &entry_id).await?;
    state.savings_entries.delete(&entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The entry, only if it belongs to `member_id`.
async fn find_entry(
    state: &AppState,
    member_id: &str,
    entry_id: &str,
) -> ApiResult<MemberSavingsEntry> {
    state
        .savings_entries
        .find_by_id(entry_id)
        .await?
        .filter(|e| e.member_id == member_id)
        .ok_or_else(|| ApiError::not_found(MemberSavingsEntry::KIND, entry_id))
}
