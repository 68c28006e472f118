//! # Money Module
//!
//! Provides the `Money` type and the two Rupiah formatters used across
//! the portal.
//!
//! ## Why Integer Rupiah?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The Rupiah has no minor unit in daily use. Every stored amount        │
//! │  (loan principal, deposit, installment) is a whole number of Rupiah.   │
//! │                                                                         │
//! │  Stored:    Money(5_000_000)                                            │
//! │  Derived:   monthly installment 491 666.666… (f64, display only)        │
//! │  Displayed: "Rp 491.666,67"  (format_rupiah)                            │
//! │             "491.666,667"    (format_grouped)                           │
//! │             "Rp 5.000.000"   (Money's Display)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kud_core::money::{format_grouped, format_rupiah, Money};
//!
//! let amount = Money::from_rupiah(5_000_000);
//! assert_eq!(amount.to_string(), "Rp 5.000.000");
//! assert_eq!(format_rupiah(5_000_000.0), "Rp 5.000.000,00");
//! assert_eq!(format_grouped(491_666.6666), "491.666,667");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::InterestRate;

/// Shown by the formatters for NaN and infinities.
const NOT_A_NUMBER: &str = "-";

// =============================================================================
// Money Type
// =============================================================================

/// A whole-Rupiah amount.
///
/// ## Where Money is Used
/// ```text
/// LoanApplication.amount ──► LoanTerms ──► monthly installment quote
/// SavingsTransaction.amount ──► SavingsSummary.total / flexible
/// Installment.installment_amount ──► LoanSummary.remaining
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole Rupiah.
    ///
    /// ## Example
    /// ```rust
    /// use kud_core::money::Money;
    ///
    /// let loan = Money::from_rupiah(2_000_000);
    /// assert_eq!(loan.rupiah(), 2_000_000);
    /// ```
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole Rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Flat interest over a number of months, exact (no rounding).
    ///
    /// `amount × bps × months / 10000`. Kept as `f64` because a principal
    /// that is not a multiple of 200 produces fractional Rupiah at 1.5%.
    ///
    /// ## Example
    /// ```rust
    /// use kud_core::money::Money;
    /// use kud_core::types::InterestRate;
    ///
    /// let principal = Money::from_rupiah(5_000_000);
    /// let interest = principal.flat_interest(InterestRate::from_bps(150), 12);
    /// assert_eq!(interest, 900_000.0);
    /// ```
    pub fn flat_interest(&self, rate: InterestRate, months: u32) -> f64 {
        // i128 keeps large principals from overflowing before the division
        let scaled = self.0 as i128 * rate.bps() as i128 * months as i128;
        scaled as f64 / 10_000.0
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a typed amount such as `"Rp 5.000.000"` or `"5000000"`.
///
/// Every non-digit character is dropped. A leading `-` (after trimming)
/// marks the amount negative so callers can reject it. Returns `None` when
/// no digit remains or the number does not fit.
///
/// ## Example
/// ```rust
/// use kud_core::money::{parse_rupiah, Money};
///
/// assert_eq!(parse_rupiah("Rp 5.000.000"), Some(Money::from_rupiah(5_000_000)));
/// assert_eq!(parse_rupiah("-250"), Some(Money::from_rupiah(-250)));
/// assert_eq!(parse_rupiah("abc"), None);
/// ```
pub fn parse_rupiah(text: &str) -> Option<Money> {
    parse_digits(text).map(Money::from_rupiah)
}

/// Digit-stripping integer parse shared by amounts and durations.
pub(crate) fn parse_digits(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

// =============================================================================
// Formatters
// =============================================================================

/// Formats an amount with the Rupiah symbol and exactly two decimals.
///
/// Indonesian convention: `.` groups thousands, `,` separates decimals.
/// Rounds half away from zero.
///
/// ## Example
/// ```rust
/// use kud_core::money::format_rupiah;
///
/// assert_eq!(format_rupiah(5_000_000.0), "Rp 5.000.000,00");
/// assert_eq!(format_rupiah(491_666.666_666), "Rp 491.666,67");
/// assert_eq!(format_rupiah(-1_500.5), "-Rp 1.500,50");
/// ```
pub fn format_rupiah(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }
    let hundredths = (value.abs() * 100.0).round() as u128;
    let sign = if value < 0.0 && hundredths > 0 { "-" } else { "" };
    format!(
        "{}Rp {},{:02}",
        sign,
        group_thousands(hundredths / 100),
        hundredths % 100
    )
}

/// Formats an amount with Indonesian grouping, no symbol, and up to three
/// decimals (trailing zeros dropped).
///
/// ## Example
/// ```rust
/// use kud_core::money::format_grouped;
///
/// assert_eq!(format_grouped(5_000_000.0), "5.000.000");
/// assert_eq!(format_grouped(491_666.666_666), "491.666,667");
/// assert_eq!(format_grouped(12.5), "12,5");
/// ```
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }
    let thousandths = (value.abs() * 1000.0).round() as u128;
    let sign = if value < 0.0 && thousandths > 0 { "-" } else { "" };
    let whole = group_thousands(thousandths / 1000);
    let fraction = thousandths % 1000;
    if fraction == 0 {
        return format!("{sign}{whole}");
    }
    let digits = format!("{fraction:03}");
    format!("{sign}{whole},{}", digits.trim_end_matches('0'))
}

/// `5000000` → `"5.000.000"`.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// `Rp 5.000.000`, whole Rupiah.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}Rp {}",
            sign,
            group_thousands(self.0.unsigned_abs() as u128)
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
