//! Dashboard and portfolio totals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    Installment, InstallmentStatus, LoanApplication, LoanStatus, SavingsKind, SavingsTransaction,
};

/// Savings header of the member savings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavingsSummary {
    /// Completed deposits of every kind.
    pub total: Money,
    /// Completed voluntary (Sukarela) deposits.
    pub flexible: Money,
}

impl SavingsSummary {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a SavingsTransaction>) -> Self {
        transactions
            .into_iter()
            .filter(|t| t.is_completed())
            .fold(SavingsSummary::default(), |mut acc, t| {
                acc.total += t.amount;
                if t.kind == SavingsKind::Voluntary {
                    acc.flexible += t.amount;
                }
                acc
            })
    }
}

/// Loan header of the member loan status screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanSummary {
    pub loan_amount: Money,
    /// Unpaid installments billed to the member.
    pub remaining: Money,
}

impl LoanSummary {
    pub fn compute<'a>(
        loan_amount: Money,
        nik: &str,
        installments: impl IntoIterator<Item = &'a Installment>,
    ) -> Self {
        let remaining = installments
            .into_iter()
            .filter(|i| i.nik == nik && i.status == InstallmentStatus::Unpaid)
            .map(|i| i.installment_amount)
            .sum();
        LoanSummary {
            loan_amount,
            remaining,
        }
    }
}

/// Cards on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub member_count: usize,
    pub loan_application_count: usize,
    pub pending_application_count: usize,
    /// Completed savings deposits.
    pub savings_total: Money,
    /// Principal of approved loans.
    pub loans_total: Money,
}

impl DashboardStats {
    pub fn compute(
        member_count: usize,
        applications: &[LoanApplication],
        savings: &[SavingsTransaction],
    ) -> Self {
        DashboardStats {
            member_count,
            loan_application_count: applications.len(),
            pending_application_count: applications
                .iter()
                .filter(|a| a.status == LoanStatus::Pending)
                .count(),
            savings_total: SavingsSummary::from_transactions(savings).total,
            loans_total: applications
                .iter()
                .filter(|a| a.status == LoanStatus::Approved)
                .map(|a| a.amount)
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SavingsStatus;
    use chrono::NaiveDate;

    fn deposit(id: u32, amount: i64, kind: SavingsKind, status: SavingsStatus) -> SavingsTransaction {
        SavingsTransaction {
            id: id.to_string(),
            nik: "3214876512345679".to_string(),
            name: "Maemunah".to_string(),
            amount: Money::from_rupiah(amount),
            kind,
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            status,
        }
    }

    fn installment(nik: &str, amount: i64, status: InstallmentStatus) -> Installment {
        Installment {
            id: String::new(),
            nik: nik.to_string(),
            name: String::new(),
            loan_amount: Money::from_rupiah(5_000_000),
            installment_amount: Money::from_rupiah(amount),
            month: "Januari 2024".to_string(),
            status,
        }
    }

    #[test]
    fn test_savings_summary_counts_completed_only() {
        let txs = [
            deposit(1, 100_000, SavingsKind::Voluntary, SavingsStatus::Completed),
            deposit(2, 20_000, SavingsKind::Mandatory, SavingsStatus::Completed),
            deposit(3, 50_000, SavingsKind::Principal, SavingsStatus::Completed),
            deposit(4, 65_000, SavingsKind::Voluntary, SavingsStatus::InProgress),
        ];
        let summary = SavingsSummary::from_transactions(&txs);
        assert_eq!(summary.total, Money::from_rupiah(170_000));
        assert_eq!(summary.flexible, Money::from_rupiah(100_000));
    }

    #[test]
    fn test_loan_summary_remaining() {
        let items = [
            installment("25225", 450_000, InstallmentStatus::Unpaid),
            installment("25225", 450_000, InstallmentStatus::Paid),
            installment("25225", 450_000, InstallmentStatus::Unpaid),
            installment("25226", 270_000, InstallmentStatus::Unpaid),
        ];
        let summary = LoanSummary::compute(Money::from_rupiah(5_000_000), "25225", &items);
        assert_eq!(summary.remaining, Money::from_rupiah(900_000));
        assert_eq!(summary.loan_amount, Money::from_rupiah(5_000_000));
    }

    #[test]
    fn test_oversized_stored_deposits_do_not_overflow() {
        // Rows written before amounts were capped.
        let txs = [
            deposit(1, 9_000_000_000_000_000_000, SavingsKind::Voluntary, SavingsStatus::Completed),
            deposit(2, 9_000_000_000_000_000_000, SavingsKind::Voluntary, SavingsStatus::Completed),
        ];
        let stats = DashboardStats::compute(2, &[], &txs);
        assert_eq!(stats.savings_total, Money::from_rupiah(i64::MAX));
        assert_eq!(
            SavingsSummary::from_transactions(&txs).flexible,
            Money::from_rupiah(i64::MAX)
        );
    }
}
