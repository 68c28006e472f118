//! Login, logout and member registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kud_core::forms::{LoginForm, RegistrationForm};
use kud_core::session::authenticate;
use kud_core::{CoreError, Member, Session};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::extract::{CurrentSession, JsonBody};
use crate::state::AppState;

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for later requests.
    pub token: String,
    pub session: Session,
    /// Dashboard of the session's role.
    pub redirect: &'static str,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginForm>,
) -> ApiResult<Json<LoginResponse>> {
    let session = match authenticate(&form) {
        Ok(session) => session,
        Err(err) => {
            if matches!(err, CoreError::InvalidCredentials) {
                warn!(email = %form.email.trim(), "Rejected login");
            }
            return Err(err.into());
        }
    };

    let token = state.sessions.create(&session).await?;
    info!(role = session.role.label(), "Session opened");

    Ok(Json(LoginResponse {
        token,
        redirect: session.role.home_path(),
        session,
    }))
}

/// `POST /api/auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentSession,
) -> ApiResult<StatusCode> {
    state.sessions.remove(&current.token).await?;
    info!(role = current.session.role.label(), "Session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/session`
pub async fn current_session(current: CurrentSession) -> Json<Session> {
    Json(current.session)
}

/// `POST /api/auth/register`
///
/// Creates a member record waiting for approval. No login is opened.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegistrationForm>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    let member = form.validate(state.today())?;
    let member = state.members.create(member).await?;
    info!(id = %member.id, "Member registered");
    Ok((StatusCode::CREATED, Json(member)))
}
