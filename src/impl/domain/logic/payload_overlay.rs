use serde_json::{Map, Value};

use crate::entities::ReceiptOverride;

use super::{
    alias_tables::{
        FieldAliases, CONFIRMED_SECTION, DRAFT_SECTION, OVERLAY_FIELDS, PROBE_LOCATIONS,
        RECORD_WRAPPERS,
    },
    field_extractor::locate_field,
    response_normalizer::{record_id, unwrap_record},
};

/// Values to lay over a fresh read, as `{...snapshot, ...override}`: per
/// field, a non-empty override value wins over the snapshot row's value.
pub(crate) fn overlay_values(
    snapshot: Option<&Value>,
    patch: Option<&ReceiptOverride>,
) -> Vec<(&'static FieldAliases, Value)> {
    let patch_values = patch.map(ReceiptOverride::field_values).unwrap_or_default();
    let snapshot_record = snapshot.map(unwrap_record);
    OVERLAY_FIELDS
        .iter()
        .copied()
        .filter_map(|field| {
            patch_values
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| value.clone())
                .or_else(|| snapshot_record.and_then(|row| locate_field(row, field)).cloned())
                .map(|value| (field, value))
        })
        .collect()
}

/// Writes every value under both the field's canonical name and its backend
/// alias. Values land on the record root and inside the confirmed and draft
/// sections when present, since those outrank the root. Inside a section the
/// nested probe locations (`summary.fields`, `fields`) are written as well, as
/// they are probed before the section's flat keys.
pub(crate) fn apply_overlay(payload: &mut Value, values: &[(&'static FieldAliases, Value)]) {
    let Value::Object(record) = record_mut(payload) else {
        return;
    };
    for paths in [CONFIRMED_SECTION, DRAFT_SECTION] {
        let key = paths
            .iter()
            .copied()
            .find(|key| record.get(*key).is_some_and(Value::is_object));
        if let Some(section) = key.and_then(|k| record.get_mut(k)) {
            write_section(section, values);
        }
    }
    write_values(record, values);
}

/// Merged payload handed to the normalizer when opening a receipt.
///
/// Starts from the fresh backend read; payloads that are not objects are
/// returned untouched so normalization reports them.
pub(crate) fn merge_for_review(
    receipt_id: &str,
    fresh: Value,
    snapshot: Option<&Value>,
    patch: Option<&ReceiptOverride>,
) -> Value {
    let mut merged = match fresh {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };
    if !merged.is_object() {
        return merged;
    }
    apply_overlay(&mut merged, &overlay_values(snapshot, patch));
    if record_id(&merged).is_none() {
        if let Value::Object(record) = record_mut(&mut merged) {
            record.insert("id".into(), Value::String(receipt_id.into()));
        }
    }
    merged
}

fn record_mut(payload: &mut Value) -> &mut Value {
    let wrapper = RECORD_WRAPPERS
        .iter()
        .copied()
        .find(|key| payload.get(*key).is_some_and(Value::is_object));
    match wrapper {
        Some(key) => &mut payload[key],
        None => payload,
    }
}

fn write_section(section: &mut Value, values: &[(&'static FieldAliases, Value)]) {
    for location in PROBE_LOCATIONS.iter().filter(|l| !l.is_empty()) {
        let pointer = format!("/{}", location.replace('.', "/"));
        if let Some(Value::Object(nested)) = section.pointer_mut(&pointer) {
            write_values(nested, values);
        }
    }
    if let Value::Object(flat) = section {
        write_values(flat, values);
    }
}

fn write_values(target: &mut Map<String, Value>, values: &[(&'static FieldAliases, Value)]) {
    for (field, value) in values {
        target.insert(field.name.to_string(), value.clone());
        if let Some(alias) = field.backend_alias {
            target.insert(alias.to_string(), value.clone());
        }
    }
}
