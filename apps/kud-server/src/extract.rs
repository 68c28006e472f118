//! Session extractors.
//!
//! Handlers declare who may call them by the extractor they take:
//!
//! - [`CurrentSession`] - any logged-in user
//! - [`AdminSession`] - routes under `/api/admin`
//! - [`MemberSession`] - routes under `/api/user`
//!
//! The token travels as `Authorization: Bearer <token>`.
//!
//! Form bodies arrive through [`JsonBody`], which reports unreadable JSON
//! in the same [`ApiError`] shape as a failed validation.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use kud_core::session::{gate, Access, RouteGroup, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's session and the token it was found under.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub session: Session,
}

/// A session that passed the admin gate.
#[derive(Debug, Clone)]
pub struct AdminSession(pub CurrentSession);

/// A session that passed the member gate.
#[derive(Debug, Clone)]
pub struct MemberSession(pub CurrentSession);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn lookup(parts: &Parts, state: &AppState) -> Result<Option<CurrentSession>, ApiError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    let session = state.sessions.get(token).await?;
    if session.is_none() {
        debug!("Unknown session token");
    }
    Ok(session.map(|session| CurrentSession {
        token: token.to_string(),
        session,
    }))
}

async fn gated(
    parts: &Parts,
    state: &AppState,
    group: RouteGroup,
) -> Result<CurrentSession, ApiError> {
    let current = lookup(parts, state).await?;
    match gate(current.as_ref().map(|c| &c.session), group) {
        Access::Granted => current.ok_or_else(ApiError::login_required),
        Access::RedirectToLogin => Err(ApiError::login_required()),
        Access::RedirectToHome(role) => Err(ApiError::wrong_portal(role)),
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        lookup(parts, state).await?.ok_or_else(ApiError::login_required)
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gated(parts, state, RouteGroup::Admin).await.map(AdminSession)
    }
}

impl FromRequestParts<AppState> for MemberSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gated(parts, state, RouteGroup::Member).await.map(MemberSession)
    }
}

/// `Json<T>` with an [`ApiError`] rejection.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
