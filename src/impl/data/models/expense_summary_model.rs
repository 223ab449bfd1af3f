use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{amount_model::AmountModel, iso_date_model::ISODateModel};

static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+,\d+").expect("comma decimal pattern is valid"));
static DOT_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("dot decimal pattern is valid"));
static SIGNED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number pattern is valid"));
static PERCENT_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}(?:[.,]\d+)?)\s*%").expect("percent rate pattern is valid")
});

/// Labels of `OTHER` summary fields that carry the VAT rate ("tasso IVA").
const VAT_RATE_LABELS: &[&str] = &["tasso", "aliquota", "vat rate", "tax rate"];

/// A computed VAT rate outside this range is an OCR misread, not a rate.
const PLAUSIBLE_RATE_RANGE: std::ops::RangeInclusive<f64> = 0.5..=30.0;

#[derive(Debug, Clone, PartialEq)]
struct Detection {
    text: String,
    confidence: Option<f64>,
}

/// Summary fields of a Textract `AnalyzeExpense` document.
///
/// Only the first expense document is considered; when a field type repeats,
/// the detection with the highest confidence is kept.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ExpenseSummaryModel {
    payee: Option<Detection>,
    date_raw: Option<Detection>,
    total_raw: Option<Detection>,
    tax_raw: Option<Detection>,
    vat_rate_raw: Option<Detection>,
}

impl ExpenseSummaryModel {
    pub(crate) fn is_expense_document(value: &Value) -> bool {
        value.get("ExpenseDocuments").is_some_and(Value::is_array)
    }

    pub(crate) fn from_textract(document: &Value) -> Self {
        let mut summary = Self::default();
        let fields = document
            .pointer("/ExpenseDocuments/0/SummaryFields")
            .and_then(Value::as_array);
        for field in fields.into_iter().flatten() {
            let kind = text_at(field, "/Type/Text").to_ascii_uppercase();
            let value = text_at(field, "/ValueDetection/Text");
            if value.trim().is_empty() {
                continue;
            }
            let confidence = field
                .pointer("/ValueDetection/Confidence")
                .or_else(|| field.pointer("/Type/Confidence"))
                .and_then(Value::as_f64);
            let detection = Detection {
                text: value.trim().to_string(),
                confidence,
            };
            let slot = match kind.as_str() {
                "VENDOR_NAME" => &mut summary.payee,
                "INVOICE_RECEIPT_DATE" => &mut summary.date_raw,
                "TOTAL" => &mut summary.total_raw,
                "TAX" => &mut summary.tax_raw,
                "OTHER" => {
                    let label = text_at(field, "/LabelDetection/Text").to_lowercase();
                    let is_rate_label = VAT_RATE_LABELS.iter().any(|l| label.contains(l));
                    if !is_rate_label || !value.contains('%') {
                        continue;
                    }
                    &mut summary.vat_rate_raw
                }
                _ => continue,
            };
            keep_most_confident(slot, detection);
        }
        summary
    }

    /// Best-effort receipt fields, as a flat JSON object using canonical
    /// field names. Unresolvable fields are omitted.
    pub(crate) fn inferred_fields(&self) -> Value {
        let mut out = Map::new();
        if let Some(payee) = &self.payee {
            out.insert("payee".into(), Value::String(payee.text.clone()));
        }
        if let Some(date) = self.date_raw.as_ref().and_then(|d| {
            ISODateModel::from_value(&Value::String(d.text.clone()))
        }) {
            out.insert("date".into(), Value::String(date.format("%Y-%m-%d").to_string()));
        }
        let total = self.total_raw.as_ref().and_then(|d| money_to_number(&d.text));
        let vat = self.tax_raw.as_ref().and_then(|d| money_to_number(&d.text));
        for (name, amount) in [("total", total), ("vat", vat)] {
            if let Some(n) = amount.and_then(serde_json::Number::from_f64) {
                out.insert(name.into(), Value::Number(n));
            }
        }
        let rate = self
            .vat_rate_raw
            .as_ref()
            .and_then(|d| explicit_rate(&d.text))
            .or_else(|| computed_rate(total, vat));
        if let Some(n) = rate.and_then(serde_json::Number::from_f64) {
            out.insert("vatRate".into(), Value::Number(n));
        }
        Value::Object(out)
    }
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

fn keep_most_confident(slot: &mut Option<Detection>, candidate: Detection) {
    let replace = match slot {
        None => true,
        Some(current) => candidate.confidence.unwrap_or(0.0) > current.confidence.unwrap_or(0.0),
    };
    if replace {
        *slot = Some(candidate);
    }
}

/// Money as printed on a receipt: currency markers, and either "1.234,56" or
/// "1234.56" notation.
pub(crate) fn money_to_number(s: &str) -> Option<f64> {
    let mut t = s.replace('€', "").replace("EUR", "").trim().to_string();
    if COMMA_DECIMAL.is_match(&t) && !DOT_DECIMAL.is_match(&t) {
        t = t.replace('.', "").replace(',', ".");
    }
    SIGNED_NUMBER
        .find(&t)
        .and_then(|m| AmountModel::from_value(&Value::String(m.as_str().to_string())))
}

fn explicit_rate(s: &str) -> Option<f64> {
    PERCENT_RATE
        .captures(s)
        .and_then(|caps| caps[1].replace(',', ".").parse::<f64>().ok())
}

/// Rate implied by a gross total and its VAT amount: vat / (total - vat).
fn computed_rate(total: Option<f64>, vat: Option<f64>) -> Option<f64> {
    let (total, vat) = (total?, vat?);
    if total <= 0.0 || vat <= 0.0 || total <= vat {
        return None;
    }
    let rate = vat / (total - vat) * 100.0;
    PLAUSIBLE_RATE_RANGE
        .contains(&rate)
        .then(|| (rate * 100.0).round() / 100.0)
}
