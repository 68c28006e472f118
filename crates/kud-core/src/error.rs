//! # Error Types
//!
//! Domain-specific error types for kud-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kud-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule failures                         │
//! │  ├── ValidationError  - One bad field                                  │
//! │  └── FieldErrors      - Every bad field of a submitted form            │
//! │                                                                         │
//! │  kud-db errors (separate crate)                                        │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  kud-server errors                                                     │
//! │  └── ApiError         - What the portal sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → ApiError → Portal   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No member with this id.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// No loan application with this id.
    #[error("Loan application not found: {0}")]
    LoanApplicationNotFound(String),

    /// No installment with this id.
    #[error("Installment not found: {0}")]
    InstallmentNotFound(String),

    /// Loan application is not in a state that allows the requested decision.
    ///
    /// ## When This Occurs
    /// - Approving an application that was already approved
    /// - Rejecting an application that was already approved or rejected
    #[error("Loan application {id} is {current_status}, cannot perform operation")]
    InvalidLoanStatus { id: String, current_status: String },

    /// Loan terms cannot produce a quote (zero principal or duration).
    #[error("Invalid loan terms: {reason}")]
    InvalidLoanTerms { reason: String },

    /// Email/password pair matches no known account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// One or more form fields were rejected.
    #[error("Validation error: {0}")]
    InvalidForm(#[from] FieldErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value above the accepted ceiling.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: i64 },

    /// Invalid format (e.g., letters in a NIK, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A confirmation checkbox was left unticked.
    #[error("{field} must be accepted")]
    NotAccepted { field: String },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::NotAccepted { field } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every validation failure of one form submission.
///
/// Forms validate all fields before reporting, so the portal can mark each
/// bad input at once instead of one per round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) invalid", .0.len())]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a failed check and passes a good value through.
    pub fn collect<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(err);
                None
            }
        }
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether the given field failed.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// Field name → message. The first error of a field wins.
    pub fn messages(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for err in &self.0 {
            map.entry(err.field().to_string())
                .or_insert_with(|| err.to_string());
        }
        map
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        FieldErrors(vec![err])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
