//! # Demo Fixtures
//!
//! The records every fresh portal starts with: nine members, their
//! monthly savings log, nine loan applications, a handful of
//! installments, the transaction ledger and Maemunah's savings history.
//!
//! In-memory collections are rebuilt from here on every start. The two
//! stored collections are only seeded into an empty store.

use chrono::NaiveDate;
use kud_core::money::Money;
use kud_core::types::{
    Installment, InstallmentStatus, LedgerKind, LedgerTransaction, LoanApplication, LoanStatus,
    Member, MemberSavingsEntry, MemberStatus, PaymentMark, SavingsKind, SavingsStatus,
    SavingsTransaction,
};

/// NIK of the fixed member login.
pub const MEMBER_LOGIN_NIK: &str = "3214876512345679";
const MEMBER_LOGIN_NAME: &str = "Maemunah";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn rp(amount: i64) -> Money {
    Money::from_rupiah(amount)
}

// =============================================================================
// Members
// =============================================================================

pub fn members() -> Vec<Member> {
    let rows = [
        ("00001", "25225", "Christine Brooks", "089 Kutch Green Apt. 448", date(2019, 9, 4), MemberStatus::Completed),
        ("00002", "25226", "Rosie Pearson", "979 Immanuel Ferry Suite 526", date(2019, 5, 28), MemberStatus::InProgress),
        ("00003", "25227", "Darrell Caldwell", "8587 Frida Ports", date(2019, 11, 23), MemberStatus::Rejected),
        ("00004", "25228", "Gilbert Johnston", "768 Destiny Lake Suite 600", date(2019, 2, 5), MemberStatus::Completed),
        ("00005", "25229", "Alan Cain", "042 Mylene Throughway", date(2019, 7, 29), MemberStatus::InProgress),
        ("00006", "25230", "Alfred Murray", "543 Weimann Mountain", date(2019, 8, 15), MemberStatus::Completed),
        ("00007", "25231", "Maggie Sullivan", "New Scottleberg", date(2019, 12, 21), MemberStatus::InProgress),
        ("00008", "25232", "Rosie Todd", "New Jon", date(2019, 4, 30), MemberStatus::Waiting),
        ("00009", "25233", "Dollie Hines", "124 Lyla Forge Suite 975", date(2019, 1, 9), MemberStatus::Draft),
    ];

    rows.into_iter()
        .map(|(id, nik, name, address, joined_on, status)| Member {
            id: id.to_string(),
            nik: nik.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            joined_on,
            status,
        })
        .collect()
}

/// Monthly mandatory-savings log of members 00001 and 00002.
pub fn member_savings_entries() -> Vec<MemberSavingsEntry> {
    let first_member = [
        (1, 2, PaymentMark::Paid),
        (2, 14, PaymentMark::Paid),
        (3, 11, PaymentMark::Paid),
        (4, 4, PaymentMark::Paid),
        (5, 15, PaymentMark::Paid),
        (6, 16, PaymentMark::Paid),
        (7, 10, PaymentMark::Unpaid),
        (8, 5, PaymentMark::Unpaid),
        (9, 8, PaymentMark::Unpaid),
        (10, 12, PaymentMark::Unpaid),
        (11, 7, PaymentMark::Unpaid),
        (12, 3, PaymentMark::Unpaid),
    ];
    let second_member = [(1, 3), (2, 5), (3, 7), (4, 9), (5, 11)];

    let rows = first_member
        .into_iter()
        .map(|(month, day, status)| ("00001", month, day, status))
        .chain(
            second_member
                .into_iter()
                .map(|(month, day)| ("00002", month, day, PaymentMark::Paid)),
        );

    rows.enumerate()
        .map(|(i, (member_id, month, day, status))| MemberSavingsEntry {
            id: (i + 1).to_string(),
            member_id: member_id.to_string(),
            month,
            date: date(2024, month, day),
            kind: SavingsKind::Mandatory,
            status,
        })
        .collect()
}

// =============================================================================
// Loans
// =============================================================================

pub fn loan_applications() -> Vec<LoanApplication> {
    let rows = [
        ("00001", "25225", "Christine Brooks", 5_000_000, 12, date(2023, 9, 4), LoanStatus::Pending),
        ("00002", "25226", "Rosie Pearson", 3_000_000, 6, date(2023, 5, 28), LoanStatus::Pending),
        ("00003", "25227", "Darrell Caldwell", 10_000_000, 24, date(2023, 11, 23), LoanStatus::Approved),
        ("00004", "25228", "Gilbert Johnston", 2_000_000, 6, date(2024, 2, 5), LoanStatus::Rejected),
        ("00005", "25229", "Alan Cain", 7_500_000, 18, date(2023, 7, 29), LoanStatus::Approved),
        ("00006", "25230", "Alfred Murray", 4_000_000, 12, date(2023, 8, 15), LoanStatus::Pending),
        ("00007", "25231", "Maggie Sullivan", 8_000_000, 24, date(2023, 12, 21), LoanStatus::Pending),
        ("00008", "25232", "Rosie Todd", 1_500_000, 3, date(2024, 4, 30), LoanStatus::Pending),
        ("00009", "25233", "Dollie Hines", 6_000_000, 12, date(2024, 1, 9), LoanStatus::Pending),
    ];

    rows.into_iter()
        .map(|(id, nik, name, amount, duration_months, submitted_on, status)| LoanApplication {
            id: id.to_string(),
            nik: nik.to_string(),
            name: name.to_string(),
            amount: rp(amount),
            duration_months,
            submitted_on,
            status,
        })
        .collect()
}

pub fn installments() -> Vec<Installment> {
    use InstallmentStatus::{Paid, Unpaid};

    let rows = [
        ("INS00001", "25225", "Christine Brooks", 5_000_000, 450_000, "Januari 2024", Paid),
        ("INS00002", "25226", "Rosie Pearson", 3_000_000, 270_000, "Januari 2024", Paid),
        ("INS00003", "25227", "Darrell Caldwell", 10_000_000, 900_000, "Januari 2024", Unpaid),
        ("INS00004", "25228", "Gilbert Johnston", 2_000_000, 180_000, "Januari 2024", Paid),
        ("INS00005", "25229", "Alan Cain", 7_500_000, 675_000, "Januari 2024", Unpaid),
        ("INS00006", "25225", "Christine Brooks", 5_000_000, 450_000, "Februari 2024", Paid),
        ("INS00007", "25226", "Rosie Pearson", 3_000_000, 270_000, "Februari 2024", Unpaid),
        ("INS00008", "25227", "Darrell Caldwell", 10_000_000, 900_000, "Februari 2024", Unpaid),
        ("INS00009", "25228", "Gilbert Johnston", 2_000_000, 180_000, "Februari 2024", Paid),
    ];

    rows.into_iter()
        .map(|(id, nik, name, loan, installment, month, status)| Installment {
            id: id.to_string(),
            nik: nik.to_string(),
            name: name.to_string(),
            loan_amount: rp(loan),
            installment_amount: rp(installment),
            month: month.to_string(),
            status,
        })
        .collect()
}

// =============================================================================
// Ledger & Savings
// =============================================================================

/// Fifteen days of cooperative transactions, 11-25 September 2023.
pub fn ledger_transactions() -> Vec<LedgerTransaction> {
    use LedgerKind::{Loan, MandatorySavings, PrincipalSavings, VoluntarySavings};

    let rows = [
        ("Slamet Riyadi", MandatorySavings, 50_000),
        ("Maemunah", VoluntarySavings, 100_000),
        ("Darman", PrincipalSavings, 200_000),
        ("Sutrisno", Loan, 1_000_000),
        ("Wati", MandatorySavings, 50_000),
        ("Bambang", VoluntarySavings, 150_000),
        ("Suparman", Loan, 2_000_000),
        ("Tuti", PrincipalSavings, 200_000),
        ("Joko", MandatorySavings, 50_000),
        ("Sri", VoluntarySavings, 75_000),
        ("Budi", Loan, 1_500_000),
        ("Dewi", PrincipalSavings, 200_000),
        ("Agus", MandatorySavings, 50_000),
        ("Rina", VoluntarySavings, 200_000),
        ("Hadi", Loan, 3_000_000),
    ];

    rows.into_iter()
        .zip(0u32..)
        .map(|((name, kind, amount), i)| LedgerTransaction {
            id: format!("TRX{:05}", i + 1),
            nik: (3_214_876_512_345_678u64 + u64::from(i)).to_string(),
            name: name.to_string(),
            kind,
            amount: rp(amount),
            date: date(2023, 9, 11 + i),
        })
        .collect()
}

/// Maemunah's deposits, newest first.
pub fn savings_transactions() -> Vec<SavingsTransaction> {
    use SavingsKind::{Mandatory, Principal, Voluntary};
    use SavingsStatus::{Completed, InProgress};

    let rows = [
        (18, 65_000, date(2023, 6, 1), Voluntary, InProgress),
        (17, 55_000, date(2023, 5, 20), Mandatory, Completed),
        (16, 40_000, date(2023, 5, 10), Voluntary, Completed),
        (15, 35_000, date(2023, 5, 1), Mandatory, Completed),
        (14, 25_000, date(2023, 4, 20), Principal, Completed),
        (13, 60_000, date(2023, 4, 10), Mandatory, Completed),
        (12, 45_000, date(2023, 4, 1), Voluntary, Completed),
        (11, 30_000, date(2023, 3, 20), Mandatory, Completed),
        (10, 75_000, date(2023, 3, 10), Voluntary, Completed),
        (9, 50_000, date(2023, 3, 1), Principal, Completed),
        (8, 20_000, date(2023, 2, 20), Mandatory, Completed),
        (7, 20_000, date(2023, 2, 10), Mandatory, Completed),
        (6, 100_000, date(2023, 2, 1), Voluntary, Completed),
        (5, 20_000, date(2023, 1, 20), Mandatory, Completed),
        (4, 50_000, date(2023, 1, 10), Voluntary, Completed),
        (3, 20_000, date(2023, 1, 1), Mandatory, Completed),
        (2, 20_000, date(2022, 12, 20), Mandatory, Completed),
        (1, 100_000, date(2022, 12, 10), Voluntary, Completed),
    ];

    rows.into_iter()
        .map(|(id, amount, date, kind, status)| SavingsTransaction {
            id: id.to_string(),
            nik: MEMBER_LOGIN_NIK.to_string(),
            name: MEMBER_LOGIN_NAME.to_string(),
            amount: rp(amount),
            kind,
            date,
            status,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kud_core::summary::SavingsSummary;

    #[test]
    fn test_counts() {
        assert_eq!(members().len(), 9);
        assert_eq!(member_savings_entries().len(), 17);
        assert_eq!(loan_applications().len(), 9);
        assert_eq!(installments().len(), 9);
        assert_eq!(ledger_transactions().len(), 15);
        assert_eq!(savings_transactions().len(), 18);
    }

    #[test]
    fn test_ledger_rows() {
        let ledger = ledger_transactions();
        assert_eq!(ledger[0].id, "TRX00001");
        assert_eq!(ledger[0].nik, "3214876512345678");
        assert_eq!(ledger[0].date, date(2023, 9, 11));
        assert_eq!(ledger[14].id, "TRX00015");
        assert_eq!(ledger[14].nik, "3214876512345692");
        assert_eq!(ledger[14].date, date(2023, 9, 25));
        assert_eq!(ledger[1].nik, MEMBER_LOGIN_NIK);
    }

    #[test]
    fn test_member_savings_log() {
        let entries = member_savings_entries();
        let first: Vec<_> = entries.iter().filter(|e| e.member_id == "00001").collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first.iter().filter(|e| e.status == PaymentMark::Paid).count(), 6);
        assert_eq!(entries[12].id, "13");
        assert_eq!(entries[12].member_id, "00002");
    }

    #[test]
    fn test_savings_history_totals() {
        let summary = SavingsSummary::from_transactions(&savings_transactions());
        // 18 deposits, the latest (65 000) still in progress
        assert_eq!(summary.total, Money::from_rupiah(765_000));
        assert_eq!(summary.flexible, Money::from_rupiah(410_000));
    }

    #[test]
    fn test_dates_are_valid() {
        assert!(members().iter().all(|m| m.joined_on != NaiveDate::default()));
        assert!(savings_transactions().iter().all(|t| t.date != NaiveDate::default()));
    }
}
