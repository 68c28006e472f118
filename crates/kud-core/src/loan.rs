//! # Loan Module
//!
//! Flat-rate installment math for loan quotes.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total_interest      = principal × 1.5% × months                       │
//! │  total_payable       = principal + total_interest                      │
//! │  monthly_installment = total_payable / months                          │
//! │                                                                         │
//! │  5 000 000 over 12 months:                                              │
//! │    interest 900 000 → payable 5 900 000 → 491 666.666… per month       │
//! │    display  "Rp 491.666,67"     stored  Money(491 667)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Interest is flat: it is charged on the original principal for every
//! month, not on the outstanding balance.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{format_rupiah, parse_digits, Money};
use crate::types::InterestRate;

// =============================================================================
// Raw Input
// =============================================================================

/// A calculator input as it arrives from a form: typed text or a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAmount<'a> {
    Text(&'a str),
    Number(f64),
}

impl RawAmount<'_> {
    /// Positive numeric value, or `None` for empty, non-numeric, zero and
    /// negative input.
    ///
    /// Text keeps only its digits (`"Rp 5.000.000"` → 5000000); a leading
    /// `-` marks it negative.
    pub fn positive_value(&self) -> Option<f64> {
        let value = match *self {
            RawAmount::Text(text) => parse_digits(text)? as f64,
            RawAmount::Number(n) if n.is_finite() => n,
            RawAmount::Number(_) => return None,
        };
        (value > 0.0).then_some(value)
    }
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(text: &'a str) -> Self {
        RawAmount::Text(text)
    }
}

impl<'a> From<&'a String> for RawAmount<'a> {
    fn from(text: &'a String) -> Self {
        RawAmount::Text(text.as_str())
    }
}

impl From<f64> for RawAmount<'_> {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

impl From<i64> for RawAmount<'_> {
    fn from(n: i64) -> Self {
        RawAmount::Number(n as f64)
    }
}

impl From<u32> for RawAmount<'_> {
    fn from(n: u32) -> Self {
        RawAmount::Number(n as f64)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Unrounded monthly installment at the fixed monthly rate.
///
/// Returns `None` when either input is empty, non-numeric, zero, or
/// negative.
///
/// ## Example
/// ```rust
/// use kud_core::loan::compute_installment;
///
/// let monthly = compute_installment("Rp 5.000.000", "12").unwrap();
/// assert!((monthly - 491_666.666_666).abs() < 0.001);
///
/// assert_eq!(compute_installment("", 12u32), None);
/// assert_eq!(compute_installment(1_000_000i64, 0u32), None);
/// ```
pub fn compute_installment<'a, 'b>(
    principal: impl Into<RawAmount<'a>>,
    duration: impl Into<RawAmount<'b>>,
) -> Option<f64> {
    let principal = principal.into().positive_value()?;
    let months = duration.into().positive_value()?;
    let rate = InterestRate::monthly().bps() as f64 / 10_000.0;
    Some((principal + principal * rate * months) / months)
}

// =============================================================================
// Loan Terms
// =============================================================================

/// Principal and repayment period of a loan, at the cooperative's rate.
///
/// Derived values are computed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    principal: Money,
    duration_months: u32,
    rate: InterestRate,
}

impl LoanTerms {
    /// Terms at the fixed monthly rate.
    pub fn new(principal: Money, duration_months: u32) -> CoreResult<Self> {
        Self::with_rate(principal, duration_months, InterestRate::monthly())
    }

    pub fn with_rate(principal: Money, duration_months: u32, rate: InterestRate) -> CoreResult<Self> {
        if !principal.is_positive() {
            return Err(CoreError::InvalidLoanTerms {
                reason: "principal must be positive".to_string(),
            });
        }
        if duration_months == 0 {
            return Err(CoreError::InvalidLoanTerms {
                reason: "duration must be at least one month".to_string(),
            });
        }
        Ok(LoanTerms {
            principal,
            duration_months,
            rate,
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn duration_months(&self) -> u32 {
        self.duration_months
    }

    pub fn total_interest(&self) -> f64 {
        self.principal.flat_interest(self.rate, self.duration_months)
    }

    pub fn total_payable(&self) -> f64 {
        self.principal.rupiah() as f64 + self.total_interest()
    }

    /// Exact per-month payment, before any rounding.
    pub fn monthly_installment(&self) -> f64 {
        let (numerator, denominator) = self.monthly_ratio();
        numerator as f64 / denominator as f64
    }

    /// Per-month payment rounded half up to a whole Rupiah.
    ///
    /// Integer math: `(P × (10000 + bps × n) + 5000 × n) / (10000 × n)`.
    pub fn monthly_installment_rounded(&self) -> Money {
        let (numerator, denominator) = self.monthly_ratio();
        let rounded = (numerator + denominator / 2) / denominator;
        Money::from_rupiah(rounded as i64)
    }

    /// Everything the application form shows next to the inputs.
    pub fn quote(&self) -> LoanQuote {
        let monthly = self.monthly_installment();
        LoanQuote {
            principal: self.principal,
            duration_months: self.duration_months,
            interest_rate_bps: self.rate.bps(),
            total_interest: self.total_interest(),
            total_payable: self.total_payable(),
            monthly_installment: monthly,
            monthly_installment_rounded: self.monthly_installment_rounded(),
            display: format_rupiah(monthly),
        }
    }

    /// Monthly payment as an exact fraction of Rupiah.
    fn monthly_ratio(&self) -> (i128, i128) {
        let n = self.duration_months as i128;
        let numerator = self.principal.rupiah() as i128 * (10_000 + self.rate.bps() as i128 * n);
        (numerator, 10_000 * n)
    }
}

/// Installment quote returned to the application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanQuote {
    pub principal: Money,
    pub duration_months: u32,
    pub interest_rate_bps: u32,
    pub total_interest: f64,
    pub total_payable: f64,
    pub monthly_installment: f64,
    pub monthly_installment_rounded: Money,
    /// `monthly_installment` through [`format_rupiah`].
    pub display: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_quote() {
        let terms = LoanTerms::new(Money::from_rupiah(5_000_000), 12).unwrap();
        assert_eq!(terms.total_interest(), 900_000.0);
        assert_eq!(terms.total_payable(), 5_900_000.0);
        assert!((terms.monthly_installment() - 491_666.666_666_67).abs() < 1e-6);
        assert_eq!(terms.monthly_installment_rounded(), Money::from_rupiah(491_667));

        let quote = terms.quote();
        assert_eq!(quote.display, "Rp 491.666,67");
        assert_eq!(quote.interest_rate_bps, 150);
    }

    #[test]
    fn test_installment_matches_formula_and_exceeds_plain_split() {
        let principals = [1i64, 199, 1_000, 250_000, 1_500_000, 5_000_000, 987_654_321];
        for p in principals {
            for n in [1u32, 3, 6, 7, 12, 24, 36, 120] {
                let expected = (p as f64 + p as f64 * 0.015 * n as f64) / n as f64;
                let got = compute_installment(p, n).unwrap();
                assert!(
                    (got - expected).abs() < 1e-6 * expected.max(1.0),
                    "p={p} n={n}: {got} vs {expected}"
                );
                assert!(got > p as f64 / n as f64);

                let terms = LoanTerms::new(Money::from_rupiah(p), n).unwrap();
                assert!((terms.monthly_installment() - expected).abs() < 1e-6 * expected.max(1.0));
            }
        }
    }

    #[test]
    fn test_invalid_inputs_yield_none() {
        let bad: [RawAmount; 7] = [
            RawAmount::Text(""),
            RawAmount::Text("   "),
            RawAmount::Text("abc"),
            RawAmount::Text("0"),
            RawAmount::Text("-500"),
            RawAmount::Number(0.0),
            RawAmount::Number(-3.0),
        ];
        for input in bad {
            assert_eq!(compute_installment(input, 12u32), None, "principal {input:?}");
            assert_eq!(compute_installment(1_000_000i64, input), None, "duration {input:?}");
        }
        assert_eq!(compute_installment(f64::NAN, 12u32), None);
    }

    #[test]
    fn test_text_inputs_are_sanitized() {
        let from_text = compute_installment("Rp 5.000.000", "12 bulan").unwrap();
        let from_numbers = compute_installment(5_000_000i64, 12u32).unwrap();
        assert_eq!(from_text, from_numbers);
    }

    #[test]
    fn test_rounding_half_up() {
        // 1 000 over 3 months: 1 045 / 3 = 348.33 → 348
        let terms = LoanTerms::new(Money::from_rupiah(1_000), 3).unwrap();
        assert_eq!(terms.monthly_installment_rounded().rupiah(), 348);
        // 100 over 2 months: 103 / 2 = 51.5 → 52
        let terms = LoanTerms::new(Money::from_rupiah(100), 2).unwrap();
        assert_eq!(terms.monthly_installment_rounded().rupiah(), 52);
    }

    #[test]
    fn test_terms_reject_non_positive() {
        assert!(LoanTerms::new(Money::zero(), 12).is_err());
        assert!(LoanTerms::new(Money::from_rupiah(-1), 12).is_err());
        assert!(LoanTerms::new(Money::from_rupiah(1_000), 0).is_err());
    }
}
