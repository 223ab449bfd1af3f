use std::borrow::Cow;

use fractic_server_error::ServerError;
use serde_json::Value;
use tracing::debug;

use crate::{
    data::models::{
        amount_model::AmountModel, expense_summary_model::ExpenseSummaryModel,
        iso_date_model::ISODateModel, receipt_status_model::ReceiptStatusModel,
        vat_rate_model::VatRateModel,
    },
    entities::ReceiptRecord,
    errors::InvalidRecord,
};

use super::{
    alias_tables::{
        FieldAliases, CATEGORY, CONFIRMED_AT, CONFIRMED_SECTION, CREATED_AT, DATE, DRAFT_SECTION,
        EXPORTED_AT, EXTRACTED_SECTION, ID, IMAGE_URL, LIST_WRAPPERS, NOTES, PAYEE,
        PROBE_LOCATIONS, RECORD_WRAPPERS, STATUS, TOTAL, UPDATED_AT, VAT, VAT_RATE,
    },
    field_extractor::{locate_field, locate_section, lookup_path},
};

/// Resolves a raw backend payload into the canonical receipt record.
///
/// Fails with `InvalidRecord` when the payload is not an object (arrays are
/// reduced to their first element) or carries no receipt id. Individual
/// fields never fail: unparseable values fall through to the next source and
/// finally to the field's default.
pub fn normalize(raw: &Value) -> Result<ReceiptRecord, ServerError> {
    ResponseNormalizer::new(raw).normalize()
}

pub(crate) struct ResponseNormalizer<'a> {
    raw: &'a Value,
}

impl<'a> ResponseNormalizer<'a> {
    pub(crate) fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    pub(crate) fn normalize(&self) -> Result<ReceiptRecord, ServerError> {
        let envelope = self.single_object()?;
        let sources = Sources::identify(envelope);

        let id = sources
            .resolve(&ID, text)
            .ok_or_else(|| InvalidRecord::new("no receipt id found"))?;
        let record = ReceiptRecord {
            status: sources
                .resolve(&STATUS, ReceiptStatusModel::from_value)
                .unwrap_or_default(),
            image_url: sources.resolve(&IMAGE_URL, text),
            date: sources.resolve(&DATE, ISODateModel::from_value),
            total: sources.resolve(&TOTAL, AmountModel::from_value),
            payee: sources.resolve(&PAYEE, text).unwrap_or_default(),
            vat: sources.resolve(&VAT, AmountModel::from_value),
            vat_rate: sources
                .resolve(&VAT_RATE, VatRateModel::from_value)
                .unwrap_or_default(),
            category: sources.resolve(&CATEGORY, text).unwrap_or_default(),
            notes: sources.resolve(&NOTES, text).unwrap_or_default(),
            created_at: sources.resolve(&CREATED_AT, text),
            updated_at: sources.resolve(&UPDATED_AT, text),
            confirmed_at: sources.resolve(&CONFIRMED_AT, text),
            exported_at: sources.resolve(&EXPORTED_AT, text),
            id,
        };
        debug!(
            receipt_id = %record.id,
            status = record.status.as_str(),
            tiers = sources.tiers.len(),
            "normalized receipt"
        );
        Ok(record)
    }

    fn single_object(&self) -> Result<&'a Value, ServerError> {
        let candidate = match self.raw {
            Value::Array(items) => items
                .first()
                .ok_or_else(|| InvalidRecord::new("empty array"))?,
            other => other,
        };
        if !candidate.is_object() {
            return Err(InvalidRecord::new(&format!(
                "expected an object, got {}",
                json_kind(candidate)
            )));
        }
        Ok(candidate)
    }
}

/// Payload sections in precedence order: confirmed, draft, root, extracted.
struct Sources<'a> {
    tiers: Vec<Cow<'a, Value>>,
}

impl<'a> Sources<'a> {
    fn identify(envelope: &'a Value) -> Self {
        let record = unwrap_record(envelope);
        let mut tiers: Vec<Cow<'a, Value>> = Vec::new();
        tiers.extend(locate_section(record, CONFIRMED_SECTION).map(Cow::Borrowed));
        tiers.extend(locate_section(record, DRAFT_SECTION).map(Cow::Borrowed));
        // Section subtrees are only reachable through their own tier, so a
        // nested OCR value can never outrank a root-level one.
        tiers.push(Cow::Owned(without_sections(record)));
        if !std::ptr::eq(record, envelope) {
            tiers.push(Cow::Owned(without_sections(envelope)));
        }
        let extracted = locate_section(record, EXTRACTED_SECTION).unwrap_or(record);
        if ExpenseSummaryModel::is_expense_document(extracted) {
            let summary = ExpenseSummaryModel::from_textract(extracted);
            tiers.push(Cow::Owned(summary.inferred_fields()));
        } else {
            tiers.push(Cow::Borrowed(extracted));
        }
        Self { tiers }
    }

    /// Parses the value of the highest tier holding the field. A present
    /// value that does not parse leaves the field unresolved; lower tiers
    /// are not consulted.
    fn resolve<T>(&self, field: &FieldAliases, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.tiers
            .iter()
            .find_map(|tier| locate_field(tier, field))
            .and_then(parse)
    }
}

/// The record inside a single-record envelope (`{"receipt": {...}}`), or the
/// payload itself.
pub(crate) fn unwrap_record(envelope: &Value) -> &Value {
    RECORD_WRAPPERS
        .iter()
        .find_map(|key| envelope.get(*key).filter(|v| v.is_object()))
        .unwrap_or(envelope)
}

/// Id of a raw record, without normalizing the rest of it.
pub(crate) fn record_id(raw: &Value) -> Option<String> {
    let envelope = match raw {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let record = unwrap_record(envelope);
    locate_field(record, &ID)
        .or_else(|| locate_field(envelope, &ID))
        .and_then(text)
}

/// Rows of a list response: a bare array, or an array under a known key.
pub(crate) fn list_rows(raw: &Value) -> Vec<Value> {
    let rows = match raw {
        Value::Array(items) => Some(items),
        other => LIST_WRAPPERS
            .iter()
            .find_map(|path| lookup_path(other, path).and_then(Value::as_array)),
    };
    rows.cloned().unwrap_or_default()
}

fn without_sections(record: &Value) -> Value {
    let nested_roots = CONFIRMED_SECTION
        .iter()
        .chain(DRAFT_SECTION)
        .chain(EXTRACTED_SECTION)
        .chain(PROBE_LOCATIONS)
        .filter_map(|path| path.split('.').next())
        .filter(|key| !key.is_empty());
    match record {
        Value::Object(map) => {
            let mut flat = map.clone();
            for key in nested_roots {
                flat.remove(key);
            }
            Value::Object(flat)
        }
        other => other.clone(),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
