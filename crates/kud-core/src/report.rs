//! # Report Printer
//!
//! Renders the transaction ledger as a standalone HTML page the browser
//! can print.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KUD Rukun Tani                                   │
//! │                  Laporan Transaksi Pinjaman                             │
//! │                Tanggal Cetak: 19 Oktober 2026                           │
//! │                                                                         │
//! │  ID │ NIK │ NAMA │ JENIS TRANSAKSI │ JUMLAH │ TANGGAL                   │
//! │  ───┼─────┼──────┼─────────────────┼────────┼────────                   │
//! │  ...                                                                    │
//! │                                                 Total Transaksi: 4      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller supplies the print date; this module never reads a clock.

use chrono::NaiveDate;

use crate::dates;
use crate::money::format_rupiah;
use crate::query::CategoryFilter;
use crate::types::LedgerTransaction;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.header { text-align: center; margin-bottom: 20px; }
.header h1 { margin-bottom: 5px; color: #2B7A39; }
.header p { margin-top: 0; color: #666; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; font-weight: bold; }
.footer { text-align: right; font-size: 12px; color: #666; }
@media print { .no-print { display: none; } }";

/// `"Laporan Semua Transaksi"` or `"Laporan Transaksi <type>"`.
pub fn report_title(filter: &CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => "Laporan Semua Transaksi".to_string(),
        CategoryFilter::Equals(kind) => format!("Laporan Transaksi {kind}"),
    }
}

/// Full HTML document for the given (already filtered) rows.
pub fn render_print_document(
    rows: &[LedgerTransaction],
    filter: &CategoryFilter,
    printed_on: NaiveDate,
) -> String {
    let mut body = String::new();
    for tx in rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&tx.id),
            escape_html(&tx.nik),
            escape_html(&tx.name),
            escape_html(tx.kind.label()),
            escape_html(&format_rupiah(tx.amount.rupiah() as f64)),
            dates::format_numeric(tx.date),
        ));
    }

    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Laporan Transaksi KUD Rukun Tani</title>
<style>
{STYLE}
</style>
</head>
<body>
<div class=\"header\">
<h1>KUD Rukun Tani</h1>
<h2>{title}</h2>
<p>Tanggal Cetak: {date}</p>
</div>
<table>
<thead>
<tr><th>ID</th><th>NIK</th><th>NAMA</th><th>JENIS TRANSAKSI</th><th>JUMLAH</th><th>TANGGAL</th></tr>
</thead>
<tbody>
{body}</tbody>
</table>
<div class=\"footer\">
<p>Total Transaksi: {count}</p>
</div>
<button class=\"no-print\" onclick=\"window.print()\">Cetak Laporan</button>
</body>
</html>
",
        title = escape_html(&report_title(filter)),
        date = dates::format_long_padded(printed_on),
        count = rows.len(),
    )
}

/// Escapes text for an HTML element body or attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::LedgerKind;

    fn tx(id: &str, name: &str, kind: LedgerKind, amount: i64) -> LedgerTransaction {
        LedgerTransaction {
            id: id.to_string(),
            nik: "3214876512345681".to_string(),
            name: name.to_string(),
            kind,
            amount: Money::from_rupiah(amount),
            date: NaiveDate::from_ymd_opt(2023, 9, 14).unwrap(),
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(report_title(&CategoryFilter::All), "Laporan Semua Transaksi");
        assert_eq!(
            report_title(&CategoryFilter::Equals("Pinjaman".to_string())),
            "Laporan Transaksi Pinjaman"
        );
    }

    #[test]
    fn test_document_contents() {
        let rows = vec![
            tx("TRX00004", "Sutrisno", LedgerKind::Loan, 1_000_000),
            tx("TRX00007", "Suparman", LedgerKind::Loan, 2_000_000),
        ];
        let filter = CategoryFilter::Equals("Pinjaman".to_string());
        let printed_on = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        let html = render_print_document(&rows, &filter, printed_on);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Laporan Transaksi Pinjaman</h2>"));
        assert!(html.contains("Tanggal Cetak: 09 Oktober 2026"));
        assert!(html.contains("<th>JENIS TRANSAKSI</th>"));
        assert!(html.contains("<td>TRX00007</td>"));
        assert!(html.contains("<td>Rp 1.000.000,00</td>"));
        assert!(html.contains("<td>14/09/2023</td>"));
        assert!(html.contains("Total Transaksi: 2"));
    }

    #[test]
    fn test_names_are_escaped() {
        let rows = vec![tx("TRX00001", "<script>alert('x')</script>", LedgerKind::Loan, 1)];
        let html = render_print_document(&rows, &CategoryFilter::All, NaiveDate::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_empty_report() {
        let html = render_print_document(&[], &CategoryFilter::All, NaiveDate::default());
        assert!(html.contains("Laporan Semua Transaksi"));
        assert!(html.contains("Total Transaksi: 0"));
    }
}
