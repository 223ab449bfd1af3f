use tracing::{debug, warn};

use crate::entities::ReceiptOverride;

use super::local_storage_datasource::LocalStorage;

/// Durable per-receipt store of the user's last saved edit.
///
/// Storage is best-effort: unreadable or corrupt entries read as absent, and
/// failed writes are logged rather than surfaced.
pub trait OverrideStore: Send + Sync {
    fn get(&self, receipt_id: &str) -> Option<ReceiptOverride>;

    /// Replaces the stored override wholesale with `patch`.
    fn set(&self, receipt_id: &str, patch: &ReceiptOverride);

    /// Idempotent.
    fn clear(&self, receipt_id: &str);
}

pub struct LocalOverrideStore<S: LocalStorage> {
    storage: S,
    namespace: String,
}

impl<S: LocalStorage> LocalOverrideStore<S> {
    /// Entries are stored under `"{key_prefix}{origin}:{receipt_id}"`.
    pub fn new(storage: S, key_prefix: &str, origin: &str) -> Self {
        Self {
            storage,
            namespace: format!("{key_prefix}{origin}:"),
        }
    }

    fn key(&self, receipt_id: &str) -> String {
        format!("{}{}", self.namespace, receipt_id)
    }
}

impl<S: LocalStorage> OverrideStore for LocalOverrideStore<S> {
    fn get(&self, receipt_id: &str) -> Option<ReceiptOverride> {
        let key = self.key(receipt_id);
        let raw = match self.storage.get_item(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = ?e, "override storage unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_str::<ReceiptOverride>(&raw) {
            Ok(mut patch) => {
                patch.receipt_id = receipt_id.to_string();
                Some(patch)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "corrupt override entry, ignoring");
                None
            }
        }
    }

    fn set(&self, receipt_id: &str, patch: &ReceiptOverride) {
        let key = self.key(receipt_id);
        let patch = ReceiptOverride {
            receipt_id: receipt_id.to_string(),
            ..patch.clone()
        };
        let serialized = match serde_json::to_string(&patch) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(key = %key, error = %e, "could not serialize override, not stored");
                return;
            }
        };
        match self.storage.set_item(&key, &serialized) {
            Ok(()) => debug!(key = %key, "stored override"),
            Err(e) => warn!(key = %key, error = ?e, "could not store override"),
        }
    }

    fn clear(&self, receipt_id: &str) {
        let key = self.key(receipt_id);
        if let Err(e) = self.storage.remove_item(&key) {
            warn!(key = %key, error = ?e, "could not clear override");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::datasources::local_storage_datasource::InMemoryLocalStorage,
        entities::{ReceiptStatus, VatRate},
    };

    fn store() -> LocalOverrideStore<InMemoryLocalStorage> {
        LocalOverrideStore::new(InMemoryLocalStorage::new(), "receipt_override:", "app")
    }

    #[test]
    fn set_then_clear_leaves_nothing() {
        let store = store();
        store.set("r1", &ReceiptOverride { total: Some(55.0), ..ReceiptOverride::new("r1") });
        assert!(store.get("r1").is_some());
        store.clear("r1");
        assert_eq!(store.get("r1"), None);
        store.clear("r1");
        assert_eq!(store.get("r1"), None);
    }

    #[test]
    fn set_replaces_wholesale() {
        let store = store();
        let first = ReceiptOverride {
            payee: Some("Bar Roma".into()),
            vat_rate: Some(VatRate::Ten),
            ..ReceiptOverride::new("r1")
        };
        let second = ReceiptOverride {
            total: Some(12.0),
            status: Some(ReceiptStatus::Draft),
            ..ReceiptOverride::new("r1")
        };
        store.set("r1", &first);
        store.set("r1", &second);
        assert_eq!(store.get("r1"), Some(second));
    }

    #[test]
    fn stored_patch_is_keyed_by_the_given_id() {
        let store = store();
        store.set("r2", &ReceiptOverride { notes: Some("x".into()), ..Default::default() });
        assert_eq!(store.get("r2").unwrap().receipt_id, "r2");
    }

    #[test]
    fn corrupt_entries_read_as_absent() {
        let storage = InMemoryLocalStorage::new();
        storage.set_item("receipt_override:app:r1", "{ broken").unwrap();
        storage.set_item("receipt_override:app:r2", "[1, 2]").unwrap();
        let store = LocalOverrideStore::new(storage, "receipt_override:", "app");
        assert_eq!(store.get("r1"), None);
        assert_eq!(store.get("r2"), None);
    }

    #[test]
    fn entries_are_scoped_to_the_origin() {
        let storage = InMemoryLocalStorage::new();
        storage
            .set_item("receipt_override:other:r1", r#"{"total": 9.0}"#)
            .unwrap();
        let store = LocalOverrideStore::new(storage, "receipt_override:", "app");
        assert_eq!(store.get("r1"), None);
        store.set("r1", &ReceiptOverride { total: Some(1.0), ..Default::default() });
        assert_eq!(store.storage.get_item("receipt_override:other:r1").unwrap().as_deref(), Some(r#"{"total": 9.0}"#));
        assert_eq!(store.get("r1").unwrap().total, Some(1.0));
    }
}
