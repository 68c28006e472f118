//! # Forms
//!
//! Bodies submitted by the portal screens. Every field is optional on the
//! wire (`#[serde(default)]`) so a missing input is reported as a field
//! error rather than a deserialization failure.
//!
//! ## Flow
//! ```text
//! JSON body ──► XxxForm ──► validate() ──┬──► domain record (id left blank)
//!                                        └──► FieldErrors (every bad field)
//! ```
//!
//! Ids are assigned later by the repository, so validated records carry an
//! empty id.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{FieldErrors, ValidationError};
use crate::loan::RawAmount;
use crate::money::Money;
use crate::types::{
    Gender, Installment, InstallmentStatus, LoanApplication, LoanStatus, Member,
    MemberSavingsEntry, MemberStatus, PaymentMark, Profile, SavingsKind, SavingsStatus,
    SavingsTransaction,
};
use crate::validation::{
    validate_accepted, validate_amount, validate_email, validate_loan_duration, validate_month,
    validate_nik, validate_password, validate_required, validate_text, ValidationResult,
};

// =============================================================================
// Form Value
// =============================================================================

/// An amount or count typed into a form: JSON number, text, or `null` for
/// a cleared input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FormValue {
    Number(i64),
    Decimal(f64),
    Text(String),
    Empty,
}

impl FormValue {
    /// Text the validators parse. A whole decimal (`12.0`) reads as `"12"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FormValue::Number(n) => Cow::Owned(n.to_string()),
            FormValue::Decimal(n) => Cow::Owned(n.to_string()),
            FormValue::Text(text) => Cow::Borrowed(text.as_str()),
            FormValue::Empty => Cow::Borrowed(""),
        }
    }

    /// Input for the live installment calculator, which takes fractions.
    pub fn raw(&self) -> RawAmount<'_> {
        match self {
            FormValue::Number(n) => RawAmount::from(*n),
            FormValue::Decimal(n) => RawAmount::Number(*n),
            FormValue::Text(text) => RawAmount::Text(text.as_str()),
            FormValue::Empty => RawAmount::Text(""),
        }
    }

    /// Whole Rupiah amount; sen are refused rather than dropped.
    pub fn to_amount(&self, field: &str) -> ValidationResult<Money> {
        match self {
            FormValue::Decimal(n) if n.fract() != 0.0 => Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "must be a whole number of Rupiah".to_string(),
            }),
            other => validate_amount(field, &other.as_text()),
        }
    }
}

impl Default for FormValue {
    fn default() -> Self {
        FormValue::Text(String::new())
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_string())
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n)
    }
}

/// `Ok(value)` when nothing was collected, else every error.
fn finish<T>(errors: FieldErrors, value: Option<T>) -> Result<T, FieldErrors> {
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(errors),
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

// =============================================================================
// Login & Registration
// =============================================================================

/// Login screen.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// The "remember password" checkbox. Login requires it ticked.
    pub remember_password: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.collect(validate_required("email", &self.email));
        if self.password.is_empty() {
            errors.push(ValidationError::Required {
                field: "password".to_string(),
            });
        }
        errors.collect(validate_accepted("remember_password", self.remember_password));
        finish(errors, Some(()))
    }
}

/// Self-service sign-up.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub nik: String,
    pub email: String,
    pub password: String,
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// The member record created by a successful sign-up.
    pub fn validate(&self, today: NaiveDate) -> Result<Member, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.collect(validate_text("full_name", &self.full_name));
        let nik = errors.collect(validate_nik(&self.nik));
        errors.collect(validate_email(&self.email));
        errors.collect(validate_password(&self.password));
        errors.collect(validate_accepted("accept_terms", self.accept_terms));

        let member = match (name, nik) {
            (Some(name), Some(nik)) => Some(Member {
                id: String::new(),
                nik,
                name,
                address: String::new(),
                joined_on: today,
                status: MemberStatus::Waiting,
            }),
            _ => None,
        };
        finish(errors, member)
    }
}

// =============================================================================
// Members
// =============================================================================

/// Admin create/edit of a member row.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct MemberForm {
    pub nik: String,
    pub name: String,
    pub address: String,
    /// Defaults to today on create.
    #[ts(as = "Option<String>")]
    pub joined_on: Option<NaiveDate>,
    pub status: Option<MemberStatus>,
}

impl MemberForm {
    pub fn validate(&self, today: NaiveDate) -> Result<Member, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nik = errors.collect(validate_nik(&self.nik));
        let name = errors.collect(validate_text("name", &self.name));
        let address = errors.collect(validate_text("address", &self.address));

        let member = match (nik, name, address) {
            (Some(nik), Some(name), Some(address)) => Some(Member {
                id: String::new(),
                nik,
                name,
                address,
                joined_on: self.joined_on.unwrap_or(today),
                status: self.status.unwrap_or_default(),
            }),
            _ => None,
        };
        finish(errors, member)
    }
}

/// Edit dialog of one line in a member's savings log.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct MemberSavingsEntryForm {
    pub month: u32,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub kind: Option<SavingsKind>,
    pub status: Option<PaymentMark>,
}

impl MemberSavingsEntryForm {
    pub fn validate(&self, member_id: &str) -> Result<MemberSavingsEntry, FieldErrors> {
        let mut errors = FieldErrors::new();
        let month = errors.collect(validate_month(self.month));
        let date = errors.collect(required("date", self.date));
        let kind = errors.collect(required("kind", self.kind));
        let status = errors.collect(required("status", self.status));

        let entry = match (month, date, kind, status) {
            (Some(month), Some(date), Some(kind), Some(status)) => Some(MemberSavingsEntry {
                id: String::new(),
                member_id: member_id.to_string(),
                month,
                date,
                kind,
                status,
            }),
            _ => None,
        };
        finish(errors, entry)
    }
}

// =============================================================================
// Loans
// =============================================================================

/// Member loan application form.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct LoanApplicationForm {
    pub nik: String,
    pub name: String,
    pub amount: FormValue,
    pub duration_months: FormValue,
}

impl LoanApplicationForm {
    pub fn validate(&self, today: NaiveDate) -> Result<LoanApplication, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nik = errors.collect(validate_nik(&self.nik));
        let name = errors.collect(validate_text("name", &self.name));
        let amount = errors.collect(self.amount.to_amount("amount"));
        let months = errors.collect(validate_loan_duration(&self.duration_months.as_text()));

        let application = match (nik, name, amount, months) {
            (Some(nik), Some(name), Some(amount), Some(duration_months)) => Some(LoanApplication {
                id: String::new(),
                nik,
                name,
                amount,
                duration_months,
                submitted_on: today,
                status: LoanStatus::Pending,
            }),
            _ => None,
        };
        finish(errors, application)
    }
}

/// Admin create/edit of an installment row.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct InstallmentForm {
    pub nik: String,
    pub name: String,
    pub loan_amount: FormValue,
    pub installment_amount: FormValue,
    pub month: String,
    pub status: Option<InstallmentStatus>,
}

impl InstallmentForm {
    pub fn validate(&self) -> Result<Installment, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nik = errors.collect(validate_nik(&self.nik));
        let name = errors.collect(validate_text("name", &self.name));
        let loan_amount = errors.collect(self.loan_amount.to_amount("loan_amount"));
        let installment_amount = errors.collect(self
            .installment_amount
            .to_amount("installment_amount"));
        let month = errors.collect(validate_required("month", &self.month));

        let installment = match (nik, name, loan_amount, installment_amount, month) {
            (Some(nik), Some(name), Some(loan_amount), Some(installment_amount), Some(month)) => {
                Some(Installment {
                    id: String::new(),
                    nik,
                    name,
                    loan_amount,
                    installment_amount,
                    month,
                    status: self.status.unwrap_or(InstallmentStatus::Unpaid),
                })
            }
            _ => None,
        };
        finish(errors, installment)
    }
}

// =============================================================================
// Savings
// =============================================================================

/// Admin savings deposit form.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct SavingsDepositForm {
    pub nik: String,
    pub member_name: String,
    pub amount: FormValue,
    pub kind: Option<SavingsKind>,
}

impl SavingsDepositForm {
    /// A deposit taken at the counter is recorded as already completed.
    pub fn validate(&self, today: NaiveDate) -> Result<SavingsTransaction, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nik = errors.collect(validate_nik(&self.nik));
        let name = errors.collect(validate_text("member_name", &self.member_name));
        let amount = errors.collect(self.amount.to_amount("amount"));
        let kind = errors.collect(required("kind", self.kind));

        let transaction = match (nik, name, amount, kind) {
            (Some(nik), Some(name), Some(amount), Some(kind)) => Some(SavingsTransaction {
                id: String::new(),
                nik,
                name,
                amount,
                kind,
                date: today,
                status: SavingsStatus::Completed,
            }),
            _ => None,
        };
        finish(errors, transaction)
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Account settings screen.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<Profile, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name = errors.collect(validate_text("first_name", &self.first_name));
        let email = errors.collect(validate_email(&self.email));

        let profile = match (first_name, email) {
            (Some(first_name), Some(email)) => Some(Profile {
                first_name,
                last_name: self.last_name.trim().to_string(),
                email,
                phone: self.phone.trim().to_string(),
                date_of_birth: self.date_of_birth,
                gender: self.gender,
            }),
            _ => None,
        };
        finish(errors, profile)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_form_value_deserializes_number_or_text() {
        let n: FormValue = serde_json::from_str("5000000").unwrap();
        let t: FormValue = serde_json::from_str("\"Rp 5.000.000\"").unwrap();
        assert_eq!(n, FormValue::Number(5_000_000));
        assert_eq!(t, FormValue::Text("Rp 5.000.000".to_string()));
        assert_eq!(n.as_text(), "5000000");
    }

    #[test]
    fn test_form_value_accepts_null_and_decimals() {
        let cleared: FormValue = serde_json::from_str("null").unwrap();
        let fractional: FormValue = serde_json::from_str("5000000.5").unwrap();
        let whole: FormValue = serde_json::from_str("12.0").unwrap();

        assert_eq!(cleared, FormValue::Empty);
        assert_eq!(cleared.as_text(), "");
        assert_eq!(fractional, FormValue::Decimal(5_000_000.5));
        assert_eq!(fractional.raw().positive_value(), Some(5_000_000.5));
        assert_eq!(whole.as_text(), "12");
    }

    #[test]
    fn test_form_value_amount_refuses_sen() {
        assert_eq!(
            FormValue::Decimal(150_000.0).to_amount("amount").unwrap(),
            Money::from_rupiah(150_000)
        );
        assert!(matches!(
            FormValue::Decimal(150_000.5).to_amount("amount"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            FormValue::Empty.to_amount("amount"),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_login_requires_remember_password() {
        let form = LoginForm {
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
            remember_password: false,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has("remember_password"));
    }

    #[test]
    fn test_login_collects_all_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("password"));
        assert!(errors.has("remember_password"));
    }

    #[test]
    fn test_registration_creates_waiting_member() {
        let form = RegistrationForm {
            full_name: " Siti Aminah ".to_string(),
            nik: "3214876512345700".to_string(),
            email: "siti@example.com".to_string(),
            password: "rahasia123".to_string(),
            accept_terms: true,
        };
        let member = form.validate(today()).unwrap();
        assert_eq!(member.name, "Siti Aminah");
        assert_eq!(member.status, MemberStatus::Waiting);
        assert_eq!(member.joined_on, today());
        assert!(member.id.is_empty());
    }

    #[test]
    fn test_registration_reports_every_field() {
        let form = RegistrationForm {
            password: "short".to_string(),
            ..RegistrationForm::default()
        };
        let errors = form.validate(today()).unwrap_err();
        for field in ["full_name", "nik", "email", "password", "accept_terms"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_loan_application_form() {
        let form: LoanApplicationForm = serde_json::from_value(serde_json::json!({
            "nik": "3214876512345679",
            "name": "Maemunah",
            "amount": "Rp 5.000.000",
            "duration_months": 12
        }))
        .unwrap();
        let app = form.validate(today()).unwrap();
        assert_eq!(app.amount, Money::from_rupiah(5_000_000));
        assert_eq!(app.duration_months, 12);
        assert_eq!(app.status, LoanStatus::Pending);
    }

    #[test]
    fn test_loan_application_rejects_unknown_duration() {
        let form = LoanApplicationForm {
            nik: "25225".to_string(),
            name: "Christine Brooks".to_string(),
            amount: FormValue::from(1_000_000i64),
            duration_months: FormValue::from("18"),
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has("duration_months"));
    }

    #[test]
    fn test_installment_form_sanitizes_amounts() {
        let form = InstallmentForm {
            nik: "25225".to_string(),
            name: "Christine Brooks".to_string(),
            loan_amount: FormValue::from("5.000.000"),
            installment_amount: FormValue::from("Rp 450.000"),
            month: "Maret 2024".to_string(),
            status: None,
        };
        let installment = form.validate().unwrap();
        assert_eq!(installment.loan_amount.rupiah(), 5_000_000);
        assert_eq!(installment.installment_amount.rupiah(), 450_000);
        assert_eq!(installment.status, InstallmentStatus::Unpaid);
    }

    #[test]
    fn test_installment_form_requires_all_fields() {
        let errors = InstallmentForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_savings_deposit_is_completed() {
        let form = SavingsDepositForm {
            nik: "3214876512345679".to_string(),
            member_name: "Maemunah".to_string(),
            amount: FormValue::from(150_000i64),
            kind: Some(SavingsKind::Voluntary),
        };
        let tx = form.validate(today()).unwrap();
        assert_eq!(tx.status, SavingsStatus::Completed);
        assert_eq!(tx.date, today());

        let errors = SavingsDepositForm::default().validate(today()).unwrap_err();
        assert!(errors.has("kind"));
        assert!(errors.has("amount"));
    }

    #[test]
    fn test_member_savings_entry_form() {
        let form = MemberSavingsEntryForm {
            month: 7,
            date: NaiveDate::from_ymd_opt(2024, 7, 10),
            kind: Some(SavingsKind::Mandatory),
            status: Some(PaymentMark::Paid),
        };
        let entry = form.validate("00001").unwrap();
        assert_eq!(entry.member_id, "00001");
        assert_eq!(entry.month_name(), "Juli");

        let errors = MemberSavingsEntryForm::default().validate("00001").unwrap_err();
        assert!(errors.has("month"));
        assert!(errors.has("date"));
    }

    #[test]
    fn test_profile_form() {
        let form = ProfileForm {
            first_name: "Siti".to_string(),
            last_name: " Aminah ".to_string(),
            email: "siti@example.com".to_string(),
            ..ProfileForm::default()
        };
        let profile = form.validate().unwrap();
        assert_eq!(profile.display_name(), "Siti Aminah");

        let errors = ProfileForm::default().validate().unwrap_err();
        assert!(errors.has("first_name"));
        assert!(errors.has("email"));
    }
}
