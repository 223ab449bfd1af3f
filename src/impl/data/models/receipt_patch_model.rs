use serde_json::{Map, Value};

use crate::entities::ReceiptOverride;

use super::iso_date_model::ISODateModel;

/// Body of a receipt update. Fields are written under camelCase keys and,
/// where the spelling differs, a parallel snake_case key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReceiptPatchModel {
    payee: Option<String>,
    date: Option<String>,
    total: Option<f64>,
    vat: Option<f64>,
    vat_rate: Option<String>,
    category: Option<String>,
    notes: Option<String>,
    status: Option<String>,
    exported_at: Option<String>,
}

impl ReceiptPatchModel {
    pub(crate) fn from_override(patch: &ReceiptOverride, exported_at: Option<String>) -> Self {
        Self {
            payee: patch.payee.clone(),
            // Prefer ISO dates on the wire; keep what the user typed otherwise.
            date: patch.date.as_ref().map(|raw| {
                ISODateModel::from_value(&Value::String(raw.clone()))
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| raw.trim().to_string())
            }),
            total: patch.total,
            vat: patch.vat,
            vat_rate: patch.vat_rate.map(|r| r.as_str().to_string()),
            category: patch.category.clone(),
            notes: patch.notes.clone(),
            status: patch.status.map(|s| s.as_str().to_string()),
            exported_at,
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        let mut body = Map::new();
        let mut put = |keys: &[&str], value: Option<Value>| {
            if let Some(value) = value {
                for key in keys {
                    body.insert(key.to_string(), value.clone());
                }
            }
        };
        let text = |v: &Option<String>| v.clone().map(Value::String);
        let number = |v: Option<f64>| v.and_then(serde_json::Number::from_f64).map(Value::Number);

        put(&["payee"], text(&self.payee));
        put(&["date"], text(&self.date));
        put(&["total"], number(self.total));
        put(&["vat"], number(self.vat));
        put(&["vatRate", "vat_rate"], text(&self.vat_rate));
        put(&["category", "categoryId", "category_id"], text(&self.category));
        put(&["notes", "note"], text(&self.notes));
        put(&["status"], text(&self.status));
        put(&["ynabExportedAt", "ynab_exported_at"], text(&self.exported_at));
        Value::Object(body)
    }
}
