use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use super::receipt_record::{ReceiptRecord, ReceiptStatus, VatRate};

/// The user's last locally saved edit of a receipt.
///
/// Always a complete snapshot of the editable fields at save time: storing an
/// override replaces the previous one, so a field left `None` here is simply
/// not overlaid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOverride {
    #[serde(default)]
    pub receipt_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<VatRate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReceiptStatus>,
}

impl ReceiptOverride {
    pub fn new(receipt_id: impl Into<String>) -> Self {
        Self {
            receipt_id: receipt_id.into(),
            ..Default::default()
        }
    }

    /// Snapshot of the editable fields of an already normalized record.
    pub fn from_record(record: &ReceiptRecord) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            receipt_id: record.id.clone(),
            payee: non_empty(&record.payee),
            date: record.date.map(|d| d.format("%Y-%m-%d").to_string()),
            total: record.total,
            vat: record.vat,
            vat_rate: Some(record.vat_rate),
            category: non_empty(&record.category),
            notes: non_empty(&record.notes),
            status: Some(record.status),
        }
    }

    pub fn is_confirming(&self) -> bool {
        self.status.is_some_and(|s| s.is_confirmed())
    }

    /// Non-empty fields as raw JSON values, keyed by canonical field name.
    pub(crate) fn field_values(&self) -> Vec<(&'static str, Value)> {
        let text = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
        };
        let number = |v: Option<f64>| v.and_then(serde_json::Number::from_f64).map(Value::Number);
        [
            ("payee", text(&self.payee)),
            ("date", text(&self.date)),
            ("total", number(self.total)),
            ("vat", number(self.vat)),
            ("vatRate", self.vat_rate.map(|r| Value::String(r.as_str().into()))),
            ("category", text(&self.category)),
            ("notes", text(&self.notes)),
            ("status", self.status.map(|s| Value::String(s.as_str().into()))),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}
