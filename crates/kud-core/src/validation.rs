//! # Validation Module
//!
//! Single-field validators. Form types in [`crate::forms`] run several of
//! these and collect every failure into [`crate::FieldErrors`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Portal form                                                  │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: axum handler                                                 │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: presence and format rules                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain rules (loan status transitions, lookups)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators return the cleaned value (trimmed text, parsed amount) so
//! callers never parse twice.

use crate::error::ValidationError;
use crate::money::{parse_digits, parse_rupiah, Money};
use crate::{LOAN_DURATIONS, MAX_AMOUNT, MIN_PASSWORD_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text name or address accepted.
const MAX_TEXT_LEN: usize = 200;

/// Longest NIK accepted (the national format is 16 digits).
const MAX_NIK_LEN: usize = 16;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects blank input. Returns the trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates a person's name or an address line.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = validate_required(field, value)?;
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(value)
}

/// Validates a national identity number (NIK).
///
/// ## Rules
/// - Must not be blank
/// - Digits only
/// - At most 16 digits
///
/// ## Example
/// ```rust
/// use kud_core::validation::validate_nik;
///
/// assert_eq!(validate_nik(" 3214876512345679 ").unwrap(), "3214876512345679");
/// assert!(validate_nik("").is_err());
/// assert!(validate_nik("32-14").is_err());
/// ```
pub fn validate_nik(value: &str) -> ValidationResult<String> {
    let nik = validate_required("nik", value)?;
    if !nik.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "nik".to_string(),
            reason: "must contain digits only".to_string(),
        });
    }
    if nik.len() > MAX_NIK_LEN {
        return Err(ValidationError::TooLong {
            field: "nik".to_string(),
            max: MAX_NIK_LEN,
        });
    }
    Ok(nik)
}

/// Validates an email address: present, with text on both sides of `@`.
pub fn validate_email(value: &str) -> ValidationResult<String> {
    let email = validate_required("email", value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a new password. Passwords are not trimmed.
pub fn validate_password(value: &str) -> ValidationResult<String> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(value.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a typed Rupiah amount such as `"Rp 1.500.000"`.
///
/// ## Rules
/// - Must contain at least one digit
/// - Must be positive after stripping formatting
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Savings deposit form                                                   │
/// │                                                                         │
/// │  Admin types: "Rp 150.000"                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_amount("amount", "Rp 150.000") ← THIS FUNCTION                │
/// │       │                                                                 │
/// │       ├── no digits? → "amount is required"                             │
/// │       ├── ≤ 0?       → "amount must be positive"                        │
/// │       ├── > MAX?     → "amount must not exceed ..."                     │
/// │       └── OK → Money(150_000)                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_amount(field: &str, text: &str) -> ValidationResult<Money> {
    let amount = match parse_rupiah(text) {
        Some(amount) => amount,
        // Digits that do not fit an i64 are over the ceiling too.
        None if text.chars().any(|c| c.is_ascii_digit()) => {
            return Err(ValidationError::TooLarge {
                field: field.to_string(),
                max: MAX_AMOUNT,
            });
        }
        None => {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    };
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if amount.rupiah() > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT,
        });
    }
    Ok(amount)
}

/// Validates the repayment period picked on the application form.
///
/// Accepts `"12"` as well as `"12 bulan"`.
pub fn validate_loan_duration(text: &str) -> ValidationResult<u32> {
    let field = "duration_months";
    let months = parse_digits(text).ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })?;
    LOAN_DURATIONS
        .iter()
        .copied()
        .find(|&d| i64::from(d) == months)
        .ok_or_else(|| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: LOAN_DURATIONS.iter().map(|d| d.to_string()).collect(),
        })
}

/// Validates a billing month, 1-12.
pub fn validate_month(month: u32) -> ValidationResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: "must be between 1 and 12".to_string(),
        });
    }
    Ok(month)
}

// =============================================================================
// Flags
// =============================================================================

/// Requires a confirmation checkbox to be ticked.
pub fn validate_accepted(field: &str, ticked: bool) -> ValidationResult<()> {
    if ticked {
        Ok(())
    } else {
        Err(ValidationError::NotAccepted {
            field: field.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", "  Wati ").unwrap(), "Wati");
        assert!(matches!(
            validate_required("name", "   "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_text_length() {
        assert!(validate_text("address", &"a".repeat(200)).is_ok());
        assert!(matches!(
            validate_text("address", &"a".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_nik() {
        assert!(validate_nik("25225").is_ok());
        assert!(validate_nik("3214876512345679").is_ok());
        assert!(matches!(
            validate_nik("32148765123456790"),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_nik("NIK123"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" user@example.com ").unwrap(), "user@example.com");
        assert!(validate_email("user@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("userexample.com").is_err());
        assert!(matches!(validate_email(""), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(matches!(validate_password(""), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(
            validate_amount("amount", "Rp 1.500.000").unwrap(),
            Money::from_rupiah(1_500_000)
        );
        assert!(matches!(
            validate_amount("amount", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_amount("amount", "0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_amount("amount", "-10"),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_amount_ceiling() {
        assert_eq!(
            validate_amount("amount", &MAX_AMOUNT.to_string()).unwrap(),
            Money::from_rupiah(MAX_AMOUNT)
        );
        assert!(matches!(
            validate_amount("amount", &(MAX_AMOUNT + 1).to_string()),
            Err(ValidationError::TooLarge { max: MAX_AMOUNT, .. })
        ));
        assert!(matches!(
            validate_amount("amount", "9000000000000000000"),
            Err(ValidationError::TooLarge { .. })
        ));
        // Past i64::MAX
        assert!(matches!(
            validate_amount("amount", "99999999999999999999999"),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_loan_duration() {
        assert_eq!(validate_loan_duration("12").unwrap(), 12);
        assert_eq!(validate_loan_duration("36 bulan").unwrap(), 36);
        assert!(matches!(
            validate_loan_duration("18"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            validate_loan_duration(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  budi ").unwrap(), "budi");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_month_and_accepted() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());

        assert!(validate_accepted("accept_terms", true).is_ok());
        assert!(matches!(
            validate_accepted("accept_terms", false),
            Err(ValidationError::NotAccepted { .. })
        ));
    }
}
