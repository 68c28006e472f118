//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Portal API                         │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │       │                                                                 │
//! │       ├── FieldErrors      → 400 VALIDATION_ERROR + per-field messages │
//! │       ├── JsonRejection    → 400 MALFORMED_BODY                        │
//! │       ├── CoreError        → 401 / 404 / 409 / 422                     │
//! │       ├── DbError          → 404 NOT_FOUND or 500 DATABASE_ERROR       │
//! │       └── Access (gate)    → 401 / 403 + redirect                      │
//! │                                                                         │
//! │  Response body:                                                         │
//! │  {                                                                      │
//! │    "code": "VALIDATION_ERROR",                                          │
//! │    "message": "2 field(s) invalid",                                     │
//! │    "fields": { "email": "email is required", ... },                     │
//! │    "redirect": null                                                     │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kud_core::session::{Access, Role, LOGIN_PATH};
use kud_core::{CoreError, FieldErrors};
use kud_db::DbError;
use serde::Serialize;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field name → message, for form submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,

    /// Where the portal should navigate instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Body is not JSON or does not fit the form (400)
    MalformedBody,

    /// Wrong email/password pair (401)
    InvalidCredentials,

    /// No session (401)
    Unauthenticated,

    /// Session of the other role (403)
    Forbidden,

    /// Status transition not allowed (409)
    Conflict,

    /// Business rule violated (422)
    BusinessLogic,

    /// Storage failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::MalformedBody => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidCredentials | ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
            redirect: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// No session: 401, back to the login page.
    pub fn login_required() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "login required").with_redirect(LOGIN_PATH)
    }

    /// Session of the other portal: 403, back to the caller's own dashboard.
    pub fn wrong_portal(role: Role) -> Self {
        ApiError::new(ErrorCode::Forbidden, format!("not available to {}", role.label()))
            .with_redirect(role.home_path())
    }

    /// Rejection for a request the route gate did not grant.
    ///
    /// Returns `None` for [`Access::Granted`].
    pub fn from_access(access: Access) -> Option<Self> {
        match access {
            Access::Granted => None,
            Access::RedirectToLogin => Some(ApiError::login_required()),
            Access::RedirectToHome(role) => Some(ApiError::wrong_portal(role)),
        }
    }

    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(path.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        let mut error = ApiError::new(ErrorCode::ValidationError, errors.to_string());
        error.fields = Some(errors.messages());
        error
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MemberNotFound(id) => ApiError::not_found("Member", &id),
            CoreError::LoanApplicationNotFound(id) => ApiError::not_found("Loan application", &id),
            CoreError::InstallmentNotFound(id) => ApiError::not_found("Installment", &id),
            CoreError::InvalidLoanStatus { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            CoreError::InvalidLoanTerms { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(FieldErrors::from(e)),
            CoreError::InvalidForm(errors) => ApiError::from(errors),
        }
    }
}

/// Unreadable bodies get the same shape as invalid forms.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::new(ErrorCode::MalformedBody, rejection.body_text())
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::CorruptValue { key, reason } => {
                tracing::error!(key = %key, reason = %reason, "Stored value is corrupt");
                ApiError::new(ErrorCode::DatabaseError, format!("stored data under '{key}' is corrupt"))
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kud_core::ValidationError;

    #[test]
    fn test_field_errors_become_400_with_fields() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::Required {
            field: "email".to_string(),
        });
        errors.push(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });

        let api = ApiError::from(errors);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        let fields = api.fields.unwrap();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_core_error_statuses() {
        assert_eq!(
            ApiError::from(CoreError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(CoreError::InvalidLoanStatus {
                id: "00003".to_string(),
                current_status: "Disetujui".to_string(),
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(CoreError::MemberNotFound("00042".to_string())).message,
            "Member not found: 00042"
        );
    }

    #[test]
    fn test_db_errors_hide_internals() {
        let api = ApiError::from(DbError::QueryFailed("no such table: kv_store".to_string()));
        assert_eq!(api.code, ErrorCode::DatabaseError);
        assert!(!api.message.contains("kv_store"));

        let api = ApiError::from(DbError::not_found("installment", "INS00404"));
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_gate_rejections() {
        assert!(ApiError::from_access(Access::Granted).is_none());

        let login = ApiError::from_access(Access::RedirectToLogin).unwrap();
        assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(login.redirect.as_deref(), Some("/login"));

        let home = ApiError::from_access(Access::RedirectToHome(Role::Member)).unwrap();
        assert_eq!(home.status(), StatusCode::FORBIDDEN);
        assert_eq!(home.redirect.as_deref(), Some("/user/dashboard"));
    }
}
