use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use serde_json::{json, Value};

use crate::{
    domain::logic::payload_overlay::{apply_overlay, overlay_values},
    entities::ReceiptOverride,
};

/// Rows of the most recent list read, keyed by receipt id. Memory only.
#[derive(Debug, Default)]
pub struct ListSnapshotCache {
    rows: Mutex<HashMap<String, Value>>,
}

impl ListSnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new snapshot; previous rows are dropped.
    pub fn replace_all(&self, rows: impl IntoIterator<Item = (String, Value)>) {
        let mut current = self.lock();
        *current = rows.into_iter().collect();
    }

    pub fn get(&self, receipt_id: &str) -> Option<Value> {
        self.lock().get(receipt_id).cloned()
    }

    /// Overlays the patch's fields onto the cached row in place, creating a
    /// minimal row when the receipt is not in the snapshot yet.
    pub fn patch(&self, receipt_id: &str, patch: &ReceiptOverride) {
        let mut rows = self.lock();
        let row = rows
            .entry(receipt_id.to_string())
            .or_insert_with(|| json!({ "id": receipt_id }));
        if !row.is_object() {
            *row = json!({ "id": receipt_id });
        }
        apply_overlay(row, &overlay_values(None, Some(patch)));
    }

    pub fn remove(&self, receipt_id: &str) {
        self.lock().remove(receipt_id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_all_drops_previous_rows() {
        let cache = ListSnapshotCache::new();
        cache.replace_all([("a".to_string(), json!({ "id": "a" }))]);
        cache.replace_all([("b".to_string(), json!({ "id": "b" }))]);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(json!({ "id": "b" })));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn patch_overlays_fields_without_replacing_the_row() {
        let cache = ListSnapshotCache::new();
        cache.replace_all([(
            "a".to_string(),
            json!({ "id": "a", "payee": "Old", "createdAt": "2025-11-01" }),
        )]);
        let patch = ReceiptOverride {
            payee: Some("New".into()),
            total: Some(9.5),
            ..ReceiptOverride::new("a")
        };
        cache.patch("a", &patch);
        let row = cache.get("a").unwrap();
        assert_eq!(row["payee"], "New");
        assert_eq!(row["total"], json!(9.5));
        assert_eq!(row["createdAt"], "2025-11-01");
    }

    #[test]
    fn patch_creates_missing_rows() {
        let cache = ListSnapshotCache::new();
        cache.patch("z", &ReceiptOverride { notes: Some("n".into()), ..ReceiptOverride::new("z") });
        let row = cache.get("z").unwrap();
        assert_eq!(row["id"], "z");
        assert_eq!(row["notes"], "n");
        cache.remove("z");
        assert!(cache.is_empty());
    }
}
