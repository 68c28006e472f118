//! Profile settings, shared by both portals.
//!
//! Saving renames the session to "first last"; the stored profile stays
//! keyed by the login email.

use axum::extract::State;
use axum::Json;
use kud_core::forms::ProfileForm;
use kud_core::{Profile, Session};
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::extract::{AdminSession, CurrentSession, JsonBody, MemberSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileSaved {
    pub profile: Profile,
    pub session: Session,
}

pub async fn admin_profile(
    State(state): State<AppState>,
    AdminSession(current): AdminSession,
) -> ApiResult<Json<Profile>> {
    load(&state, &current).await
}

pub async fn save_admin_profile(
    State(state): State<AppState>,
    AdminSession(current): AdminSession,
    JsonBody(form): JsonBody<ProfileForm>,
) -> ApiResult<Json<ProfileSaved>> {
    save(&state, current, &form).await
}

pub async fn member_profile(
    State(state): State<AppState>,
    MemberSession(current): MemberSession,
) -> ApiResult<Json<Profile>> {
    load(&state, &current).await
}

pub async fn save_member_profile(
    State(state): State<AppState>,
    MemberSession(current): MemberSession,
    JsonBody(form): JsonBody<ProfileForm>,
) -> ApiResult<Json<ProfileSaved>> {
    save(&state, current, &form).await
}

async fn load(state: &AppState, current: &CurrentSession) -> ApiResult<Json<Profile>> {
    Ok(Json(state.profiles.get_or_default(&current.session).await?))
}

async fn save(
    state: &AppState,
    current: CurrentSession,
    form: &ProfileForm,
) -> ApiResult<Json<ProfileSaved>> {
    let profile = form.validate()?;
    let CurrentSession { token, mut session } = current;

    state.profiles.save(&session.email, &profile).await?;
    session.apply_profile(&profile);
    state.sessions.replace(&token, &session).await?;

    info!(role = session.role.label(), "Profile saved");
    Ok(Json(ProfileSaved { profile, session }))
}
