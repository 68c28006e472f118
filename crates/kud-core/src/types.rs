//! # Domain Types
//!
//! Core records of the cooperative, one per portal table.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Member      │   │ LoanApplication │   │   Installment   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id "00001"     │   │  id  (ms stamp) │   │  id "INS00001"  │       │
//! │  │  nik, name      │   │  amount, months │   │  loan, amount   │       │
//! │  │  status         │   │  LoanStatus     │   │  Lunas / Belum  │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │ 1..n                                                        │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ MemberSavings-  │   │   Savings-      │   │    Ledger-      │       │
//! │  │ Entry (log)     │   │   Transaction   │   │    Transaction  │       │
//! │  │  id 1, 2, ...   │   │  id 1, 2, ...   │   │  id "TRX00001"  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are human-readable strings. Each record type declares its
//! [`IdScheme`] and new ids are synthesized from the largest numeric suffix
//! already present, never from the collection length, so deleting a row
//! can't make the next id collide with a survivor.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dates;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::query::Searchable;

// =============================================================================
// Interest Rate
// =============================================================================

/// Interest rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so the cooperative's 1.5% monthly rate is 150.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterestRate(u32);

impl InterestRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        InterestRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The fixed monthly rate applied to every loan.
    #[inline]
    pub const fn monthly() -> Self {
        InterestRate(crate::MONTHLY_INTEREST_BPS)
    }
}

impl Default for InterestRate {
    fn default() -> Self {
        InterestRate::monthly()
    }
}

// =============================================================================
// Identity
// =============================================================================

/// How a record type mints new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// `prefix` + zero-padded counter: `"00001"`, `"INS00001"`.
    Padded { prefix: &'static str, width: usize },
    /// Bare counter: `"1"`, `"2"`.
    Sequential,
    /// Milliseconds since the epoch, bumped past the largest existing id.
    Timestamp,
}

impl IdScheme {
    /// Next id given the ids already in use.
    ///
    /// `now_millis` is only read by [`IdScheme::Timestamp`].
    ///
    /// ## Example
    /// ```rust
    /// use kud_core::types::IdScheme;
    ///
    /// let scheme = IdScheme::Padded { prefix: "INS", width: 5 };
    /// assert_eq!(scheme.next_id(["INS00001", "INS00009"], 0), "INS00010");
    /// assert_eq!(IdScheme::Sequential.next_id(Vec::<&str>::new(), 0), "1");
    /// ```
    pub fn next_id<'a>(&self, existing: impl IntoIterator<Item = &'a str>, now_millis: i64) -> String {
        let max = existing
            .into_iter()
            .filter_map(numeric_suffix)
            .max()
            .unwrap_or(0);

        match *self {
            IdScheme::Padded { prefix, width } => {
                format!("{prefix}{:0width$}", max + 1, width = width)
            }
            IdScheme::Sequential => (max + 1).to_string(),
            IdScheme::Timestamp => {
                let now = u64::try_from(now_millis).unwrap_or(0);
                now.max(max + 1).to_string()
            }
        }
    }
}

/// Trailing digits of an id: `"INS00012"` → `12`, `"1718000000000"` → itself.
pub fn numeric_suffix(id: &str) -> Option<u64> {
    let start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    id[start..].parse().ok()
}

/// A record stored in a repository.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Short lowercase name used in logs and not-found errors.
    const KIND: &'static str;
    const ID_SCHEME: IdScheme;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

// =============================================================================
// Member
// =============================================================================

/// Registration state of a member as shown in the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Completed,
    InProgress,
    Rejected,
    Waiting,
    Draft,
}

impl MemberStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Completed => "Selesai",
            MemberStatus::InProgress => "Proses",
            MemberStatus::Rejected => "Ditolak",
            MemberStatus::Waiting => "Menunggu",
            MemberStatus::Draft => "Draft",
        }
    }
}

impl Default for MemberStatus {
    fn default() -> Self {
        MemberStatus::Waiting
    }
}

/// A cooperative member (anggota).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Member {
    /// Zero-padded business id, `"00001"`.
    pub id: String,
    /// National identity number (digits).
    pub nik: String,
    pub name: String,
    pub address: String,
    #[ts(as = "String")]
    pub joined_on: NaiveDate,
    pub status: MemberStatus,
}

impl Entity for Member {
    const KIND: &'static str = "member";
    const ID_SCHEME: IdScheme = IdScheme::Padded { prefix: "", width: 5 };

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for Member {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.nik.as_str()),
            Cow::Borrowed(self.name.as_str()),
        ]
    }
}

// =============================================================================
// Member Savings Entry
// =============================================================================

/// Whether a member's monthly deposit has been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMark {
    Paid,
    Unpaid,
    Pending,
}

impl PaymentMark {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMark::Paid => "SUDAH",
            PaymentMark::Unpaid => "BELUM",
            PaymentMark::Pending => "PROSES",
        }
    }
}

/// One line of the per-member savings log on the member detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MemberSavingsEntry {
    pub id: String,
    pub member_id: String,
    /// Billing month, 1-12.
    pub month: u32,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub kind: SavingsKind,
    pub status: PaymentMark,
}

impl MemberSavingsEntry {
    pub fn month_name(&self) -> &'static str {
        dates::month_name(self.month)
    }
}

impl Entity for MemberSavingsEntry {
    const KIND: &'static str = "member savings entry";
    const ID_SCHEME: IdScheme = IdScheme::Sequential;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for MemberSavingsEntry {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.month_name()),
            Cow::Owned(dates::format_long(self.date)),
            Cow::Borrowed(self.kind.long_label()),
            Cow::Borrowed(self.status.label()),
        ]
    }
}

// =============================================================================
// Loan Application
// =============================================================================

/// Review state of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Submitted, awaiting an admin decision.
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Menunggu",
            LoanStatus::Approved => "Disetujui",
            LoanStatus::Rejected => "Ditolak",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Pending
    }
}

/// Admin verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoanDecision {
    Approve,
    Reject,
}

/// A member's request to borrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanApplication {
    pub id: String,
    pub nik: String,
    pub name: String,
    pub amount: Money,
    pub duration_months: u32,
    #[ts(as = "String")]
    pub submitted_on: NaiveDate,
    pub status: LoanStatus,
}

impl LoanApplication {
    /// Applies an admin decision. Only pending applications move.
    ///
    /// ## State Machine
    /// ```text
    ///            approve
    ///  Pending ──────────► Approved
    ///     │
    ///     └──────────────► Rejected
    ///            reject
    /// ```
    pub fn decide(&mut self, decision: LoanDecision) -> CoreResult<()> {
        if self.status != LoanStatus::Pending {
            return Err(CoreError::InvalidLoanStatus {
                id: self.id.clone(),
                current_status: self.status.label().to_string(),
            });
        }
        self.status = match decision {
            LoanDecision::Approve => LoanStatus::Approved,
            LoanDecision::Reject => LoanStatus::Rejected,
        };
        Ok(())
    }
}

impl Entity for LoanApplication {
    const KIND: &'static str = "loan application";
    const ID_SCHEME: IdScheme = IdScheme::Timestamp;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for LoanApplication {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.nik.as_str()),
            Cow::Borrowed(self.name.as_str()),
        ]
    }
}

// =============================================================================
// Installment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Paid,
    Unpaid,
}

impl InstallmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InstallmentStatus::Paid => "Lunas",
            InstallmentStatus::Unpaid => "Belum Lunas",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            InstallmentStatus::Paid => InstallmentStatus::Unpaid,
            InstallmentStatus::Unpaid => InstallmentStatus::Paid,
        }
    }
}

/// One monthly repayment (cicilan) of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Installment {
    pub id: String,
    pub nik: String,
    pub name: String,
    pub loan_amount: Money,
    pub installment_amount: Money,
    /// Billing period as typed by the admin, e.g. `"Januari 2024"`.
    pub month: String,
    pub status: InstallmentStatus,
}

impl Entity for Installment {
    const KIND: &'static str = "installment";
    const ID_SCHEME: IdScheme = IdScheme::Padded { prefix: "INS", width: 5 };

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for Installment {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.nik.as_str()),
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.month.as_str()),
        ]
    }
}

// =============================================================================
// Savings Transaction
// =============================================================================

/// The three kinds of cooperative savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SavingsKind {
    /// One-off entry deposit.
    Principal,
    /// Fixed monthly deposit.
    Mandatory,
    /// Free deposit, withdrawable.
    Voluntary,
}

impl SavingsKind {
    pub fn label(&self) -> &'static str {
        match self {
            SavingsKind::Principal => "Pokok",
            SavingsKind::Mandatory => "Wajib",
            SavingsKind::Voluntary => "Sukarela",
        }
    }

    pub fn long_label(&self) -> &'static str {
        match self {
            SavingsKind::Principal => "Simpanan Pokok",
            SavingsKind::Mandatory => "Simpanan Wajib",
            SavingsKind::Voluntary => "Simpanan Sukarela",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SavingsStatus {
    InProgress,
    Completed,
}

impl SavingsStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SavingsStatus::InProgress => "Proses",
            SavingsStatus::Completed => "Selesai",
        }
    }
}

/// A deposit into a member's savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavingsTransaction {
    pub id: String,
    pub nik: String,
    pub name: String,
    pub amount: Money,
    pub kind: SavingsKind,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub status: SavingsStatus,
}

impl SavingsTransaction {
    pub fn is_completed(&self) -> bool {
        self.status == SavingsStatus::Completed
    }
}

impl Entity for SavingsTransaction {
    const KIND: &'static str = "savings transaction";
    const ID_SCHEME: IdScheme = IdScheme::Sequential;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for SavingsTransaction {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.nik.as_str()),
            Cow::Borrowed(self.name.as_str()),
        ]
    }
}

// =============================================================================
// Ledger Transaction
// =============================================================================

/// Transaction categories of the report ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    MandatorySavings,
    VoluntarySavings,
    PrincipalSavings,
    Loan,
}

impl LedgerKind {
    pub const ALL: [LedgerKind; 4] = [
        LedgerKind::MandatorySavings,
        LedgerKind::VoluntarySavings,
        LedgerKind::PrincipalSavings,
        LedgerKind::Loan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LedgerKind::MandatorySavings => "Simpanan Wajib",
            LedgerKind::VoluntarySavings => "Simpanan Sukarela",
            LedgerKind::PrincipalSavings => "Simpanan Pokok",
            LedgerKind::Loan => "Pinjaman",
        }
    }

    /// Inverse of [`LedgerKind::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

/// One row of the admin transaction report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerTransaction {
    pub id: String,
    pub nik: String,
    pub name: String,
    pub kind: LedgerKind,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl Entity for LedgerTransaction {
    const KIND: &'static str = "ledger transaction";
    const ID_SCHEME: IdScheme = IdScheme::Padded { prefix: "TRX", width: 5 };

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Searchable for LedgerTransaction {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.nik.as_str()),
            Cow::Borrowed(self.name.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(self.kind.label())
    }
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Account settings of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl Profile {
    /// `"first last"`, or just the first name when the last is blank.
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if last.is_empty() {
            first.to_string()
        } else {
            format!("{first} {last}")
        }
    }

    /// Starting profile for an account that never saved one.
    pub fn from_display_name(name: &str, email: &str) -> Self {
        let (first, last) = name.trim().split_once(' ').unwrap_or((name.trim(), ""));
        Profile {
            first_name: first.to_string(),
            last_name: last.trim().to_string(),
            email: email.to_string(),
            phone: String::new(),
            date_of_birth: None,
            gender: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn application(status: LoanStatus) -> LoanApplication {
        LoanApplication {
            id: "00001".to_string(),
            nik: "25225".to_string(),
            name: "Christine Brooks".to_string(),
            amount: Money::from_rupiah(5_000_000),
            duration_months: 12,
            submitted_on: NaiveDate::from_ymd_opt(2023, 9, 4).unwrap(),
            status,
        }
    }

    #[test]
    fn test_interest_rate() {
        let rate = InterestRate::monthly();
        assert_eq!(rate.bps(), 150);
        assert!((rate.percentage() - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(numeric_suffix("00001"), Some(1));
        assert_eq!(numeric_suffix("INS00012"), Some(12));
        assert_eq!(numeric_suffix("TRX00015"), Some(15));
        assert_eq!(numeric_suffix("17"), Some(17));
        assert_eq!(numeric_suffix("INS"), None);
        assert_eq!(numeric_suffix(""), None);
    }

    #[test]
    fn test_next_id_uses_largest_suffix() {
        let scheme = Member::ID_SCHEME;
        // 00002 was deleted; length + 1 would mint 00003 again
        assert_eq!(scheme.next_id(["00001", "00003"], 0), "00004");
        assert_eq!(scheme.next_id(Vec::<&str>::new(), 0), "00001");

        let scheme = Installment::ID_SCHEME;
        assert_eq!(scheme.next_id(["INS00009", "INS00002"], 0), "INS00010");

        assert_eq!(IdScheme::Sequential.next_id(["1", "18", "7"], 0), "19");
    }

    #[test]
    fn test_timestamp_id_is_monotonic() {
        let scheme = IdScheme::Timestamp;
        assert_eq!(scheme.next_id(["00009"], 1_700_000_000_000), "1700000000000");
        // clock behind the newest id
        assert_eq!(scheme.next_id(["1700000000005"], 1_700_000_000_000), "1700000000006");
    }

    #[test]
    fn test_decide_pending_application() {
        let mut app = application(LoanStatus::Pending);
        app.decide(LoanDecision::Approve).unwrap();
        assert_eq!(app.status, LoanStatus::Approved);

        let mut app = application(LoanStatus::Pending);
        app.decide(LoanDecision::Reject).unwrap();
        assert_eq!(app.status, LoanStatus::Rejected);
    }

    #[test]
    fn test_decide_settled_application_fails() {
        let mut app = application(LoanStatus::Approved);
        let err = app.decide(LoanDecision::Reject).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLoanStatus { .. }));
        assert_eq!(app.status, LoanStatus::Approved);
    }

    #[test]
    fn test_installment_toggle() {
        assert_eq!(InstallmentStatus::Paid.toggled(), InstallmentStatus::Unpaid);
        assert_eq!(InstallmentStatus::Unpaid.toggled(), InstallmentStatus::Paid);
        assert_eq!(InstallmentStatus::Unpaid.label(), "Belum Lunas");
    }

    #[test]
    fn test_ledger_kind_labels_round_trip() {
        for kind in LedgerKind::ALL {
            assert_eq!(LedgerKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(LedgerKind::from_label("Simpanan"), None);
    }

    #[test]
    fn test_member_savings_entry_search_fields() {
        let entry = MemberSavingsEntry {
            id: "1".to_string(),
            member_id: "00001".to_string(),
            month: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            kind: SavingsKind::Mandatory,
            status: PaymentMark::Paid,
        };
        let fields = entry.search_fields();
        assert_eq!(fields[0], "Januari");
        assert_eq!(fields[1], "2 Januari 2024");
        assert_eq!(fields[2], "Simpanan Wajib");
        assert_eq!(fields[3], "SUDAH");
    }

    #[test]
    fn test_profile_names() {
        let profile = Profile::from_display_name("Kevin Fleming Jr", "kevin@example.com");
        assert_eq!(profile.first_name, "Kevin");
        assert_eq!(profile.last_name, "Fleming Jr");
        assert_eq!(profile.display_name(), "Kevin Fleming Jr");

        let profile = Profile::from_display_name("Saepul", "admin@example.com");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.display_name(), "Saepul");
    }
}
