//! Indonesian calendar names and the date layouts the portal prints.

use chrono::{Datelike, NaiveDate};

/// Full month names, January first.
pub const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Abbreviated month names, January first.
pub const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Full name of a 1-based month. Out-of-range months yield `""`.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// `2 Januari 2024`
pub fn format_long(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name(date.month()), date.year())
}

/// `02 Januari 2024`, the report header layout.
pub fn format_long_padded(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_name(date.month()), date.year())
}

/// `04 Sep 2019`
pub fn format_short(date: NaiveDate) -> String {
    let month = SHORT_MONTHS[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}

/// `11/09/2023`
pub fn format_numeric(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
