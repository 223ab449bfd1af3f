use std::collections::BTreeMap;

use iso_currency::Currency;

use crate::entities::{ReceiptRecord, VatRate};

use super::utils::format_amount;

const UNCATEGORIZED: &str = "(uncategorized)";

/// Plain-text summary of a batch of receipts: the receipts themselves, then
/// totals per category and VAT per rate. Receipts without a total are listed
/// but not counted.
pub struct ExpenseReportPrinter {
    currency: Currency,
}

impl ExpenseReportPrinter {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub fn print_report(&self, records: &[ReceiptRecord]) -> String {
        let mut report_output = String::new();

        report_output.push_str(
            "; --- Receipts -----------------------------------------------------------------\n\n",
        );
        self.print_receipts(&mut report_output, records);
        report_output.push_str("\n\n");

        report_output.push_str(
            "; --- Totals by category -------------------------------------------------------\n\n",
        );
        self.print_category_totals(&mut report_output, records);
        report_output.push_str("\n\n");

        report_output.push_str(
            "; --- VAT by rate --------------------------------------------------------------\n\n",
        );
        self.print_vat_totals(&mut report_output, records);

        report_output
    }

    fn print_receipts(&self, report_output: &mut String, records: &[ReceiptRecord]) {
        let sorted_records = {
            let mut v: Vec<&ReceiptRecord> = records.iter().collect();
            // Undated receipts last.
            v.sort_by(|a, b| {
                (a.date.is_none(), a.date, &a.id).cmp(&(b.date.is_none(), b.date, &b.id))
            });
            v
        };
        for record in sorted_records {
            let date = match record.date {
                Some(d) => d.to_string(),
                None => "????-??-??".to_string(),
            };
            let payee = if record.payee.is_empty() {
                "(unknown payee)"
            } else {
                record.payee.as_str()
            };
            let total = record
                .total
                .map(|t| format_amount(t, self.currency))
                .unwrap_or_else(|| "-".to_string());
            report_output.push_str(&format!(
                "{} ({}) {:40} {:>16}  ; {}\n",
                date,
                record.id,
                payee,
                total,
                record.status.as_str()
            ));
        }
    }

    fn print_category_totals(&self, report_output: &mut String, records: &[ReceiptRecord]) {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            let Some(total) = record.total else {
                continue;
            };
            let category = if record.category.is_empty() {
                UNCATEGORIZED
            } else {
                record.category.as_str()
            };
            *totals.entry(category).or_default() += total;
        }
        let grand_total: f64 = totals.values().sum();
        for (category, total) in totals {
            report_output.push_str(&format!(
                "{:40} {:>16}\n",
                category,
                format_amount(total, self.currency)
            ));
        }
        report_output.push_str(&format!(
            "{:40} {:>16}\n",
            "total",
            format_amount(grand_total, self.currency)
        ));
    }

    fn print_vat_totals(&self, report_output: &mut String, records: &[ReceiptRecord]) {
        for rate in VatRate::ALL {
            let vat: Vec<f64> = records
                .iter()
                .filter(|r| r.vat_rate == rate)
                .filter_map(|r| r.vat)
                .collect();
            if vat.is_empty() {
                continue;
            }
            report_output.push_str(&format!(
                "{:>3}%  {:>4} receipt(s) {:>16}\n",
                rate.as_str(),
                vat.len(),
                format_amount(vat.iter().sum(), self.currency)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(id: &str, day: Option<u32>, total: Option<f64>, category: &str) -> ReceiptRecord {
        ReceiptRecord {
            id: id.into(),
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2025, 11, d)),
            total,
            payee: format!("Payee {id}"),
            category: category.into(),
            ..Default::default()
        }
    }

    #[test]
    fn lists_receipts_by_date_with_undated_last() {
        let records = vec![
            record("c", None, Some(1.0), ""),
            record("b", Some(20), Some(2.0), ""),
            record("a", Some(3), Some(3.0), ""),
        ];
        let report = ExpenseReportPrinter::new(Currency::EUR).print_report(&records);
        let a = report.find("(a)").unwrap();
        let b = report.find("(b)").unwrap();
        let c = report.find("(c)").unwrap();
        assert!(a < b && b < c);
        assert!(report.contains("????-??-?? (c)"));
    }

    #[test]
    fn sums_totals_per_category() {
        let records = vec![
            record("a", Some(1), Some(10.0), "meals"),
            record("b", Some(2), Some(5.5), "meals"),
            record("c", Some(3), Some(4.0), ""),
            record("d", Some(4), None, "travel"),
        ];
        let report = ExpenseReportPrinter::new(Currency::EUR).print_report(&records);
        let symbol = Currency::EUR.symbol().to_string();
        let line = |label: &str| {
            report
                .lines()
                .find(|l| l.starts_with(label))
                .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap()
        };
        assert_eq!(line("meals"), format!("meals 15.50 {symbol}"));
        assert_eq!(line(UNCATEGORIZED), format!("{UNCATEGORIZED} 4.00 {symbol}"));
        assert_eq!(line("total"), format!("total 19.50 {symbol}"));
        assert!(!report.lines().any(|l| l.starts_with("travel")));
    }

    #[test]
    fn groups_vat_by_rate() {
        let mut a = record("a", Some(1), Some(12.2), "");
        a.vat = Some(2.2);
        let mut b = record("b", Some(2), Some(11.0), "");
        b.vat = Some(1.0);
        b.vat_rate = VatRate::Ten;
        let mut c = record("c", Some(3), Some(24.4), "");
        c.vat = Some(4.4);
        let report = ExpenseReportPrinter::new(Currency::EUR).print_report(&[a, b, c]);
        let vat_section = report.split("VAT by rate").nth(1).unwrap();
        let lines: Vec<String> = vat_section
            .lines()
            .filter(|l| l.contains('%'))
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        let symbol = Currency::EUR.symbol().to_string();
        assert_eq!(
            lines,
            vec![
                format!("10% 1 receipt(s) 1.00 {symbol}"),
                format!("22% 2 receipt(s) 6.60 {symbol}"),
            ]
        );
    }
}
