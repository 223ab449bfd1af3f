use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use fractic_server_error::ServerError;
use tracing::{debug, info, warn};

use crate::{
    data::{
        datasources::{
            list_snapshot_datasource::ListSnapshotCache, override_store_datasource::OverrideStore,
        },
        models::receipt_patch_model::ReceiptPatchModel,
    },
    domain::{
        logic::{
            payload_overlay::merge_for_review,
            response_normalizer::{list_rows, normalize, record_id},
        },
        repositories::receipts_repository::ReceiptsRepository,
    },
    entities::{ReceiptOverride, ReceiptRecord},
};

#[async_trait]
pub trait ReviewUsecase: Send + Sync {
    /// Merges the fresh backend read with the list snapshot and any unsynced
    /// local edit. Unsynced edits always win.
    async fn load_for_review(&self, receipt_id: &str) -> Result<ReceiptRecord, ServerError>;

    /// Stores the edit locally, then writes it to the backend. A confirming
    /// edit retires the local override once the backend has accepted it.
    async fn save(&self, receipt_id: &str, patch: ReceiptOverride) -> Result<(), ServerError>;

    async fn delete(&self, receipt_id: &str) -> Result<(), ServerError>;

    /// Replaces the list snapshot with a fresh list read and returns its rows,
    /// normalized with unsynced edits applied.
    async fn refresh_list(&self) -> Result<Vec<ReceiptRecord>, ServerError>;

    async fn mark_exported(
        &self,
        receipt_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ReceiptRecord, ServerError>;
}

pub(crate) struct ReviewUsecaseImpl<R, O>
where
    R: ReceiptsRepository,
    O: OverrideStore,
{
    repository: R,
    overrides: O,
    snapshots: ListSnapshotCache,
}

impl<R, O> ReviewUsecaseImpl<R, O>
where
    R: ReceiptsRepository,
    O: OverrideStore,
{
    pub(crate) fn new(repository: R, overrides: O) -> Self {
        Self {
            repository,
            overrides,
            snapshots: ListSnapshotCache::new(),
        }
    }

    pub(crate) fn overrides(&self) -> &O {
        &self.overrides
    }

    pub(crate) fn snapshots(&self) -> &ListSnapshotCache {
        &self.snapshots
    }
}

#[async_trait]
impl<R, O> ReviewUsecase for ReviewUsecaseImpl<R, O>
where
    R: ReceiptsRepository,
    O: OverrideStore,
{
    async fn load_for_review(&self, receipt_id: &str) -> Result<ReceiptRecord, ServerError> {
        let snapshot = self.snapshots.get(receipt_id);
        let patch = self.overrides.get(receipt_id);
        let fresh = self.repository.fetch_receipt(receipt_id).await?;
        debug!(
            receipt_id,
            has_snapshot = snapshot.is_some(),
            has_override = patch.is_some(),
            "merging receipt for review"
        );
        normalize(&merge_for_review(
            receipt_id,
            fresh,
            snapshot.as_ref(),
            patch.as_ref(),
        ))
    }

    async fn save(&self, receipt_id: &str, patch: ReceiptOverride) -> Result<(), ServerError> {
        let patch = ReceiptOverride {
            receipt_id: receipt_id.to_string(),
            ..patch
        };
        self.overrides.set(receipt_id, &patch);
        self.snapshots.patch(receipt_id, &patch);

        let body = ReceiptPatchModel::from_override(&patch, None);
        if let Err(e) = self.repository.update_receipt(receipt_id, &body).await {
            warn!(receipt_id, "backend rejected save, keeping local override");
            return Err(e);
        }
        if patch.is_confirming() {
            self.overrides.clear(receipt_id);
            info!(receipt_id, "receipt confirmed, local override retired");
        }
        Ok(())
    }

    async fn delete(&self, receipt_id: &str) -> Result<(), ServerError> {
        self.repository.delete_receipt(receipt_id).await?;
        self.overrides.clear(receipt_id);
        self.snapshots.remove(receipt_id);
        info!(receipt_id, "receipt deleted");
        Ok(())
    }

    async fn refresh_list(&self) -> Result<Vec<ReceiptRecord>, ServerError> {
        let raw = self.repository.fetch_receipt_list().await?;
        let rows: Vec<_> = list_rows(&raw)
            .into_iter()
            .filter_map(|row| match record_id(&row) {
                Some(id) => Some((id, row)),
                None => {
                    warn!("skipping list row without a receipt id");
                    None
                }
            })
            .collect();
        self.snapshots.replace_all(rows.iter().cloned());

        let records: Vec<_> = rows
            .into_iter()
            .filter_map(|(id, row)| {
                let patch = self.overrides.get(&id);
                match normalize(&merge_for_review(&id, row, None, patch.as_ref())) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(receipt_id = %id, error = ?e, "skipping unreadable list row");
                        None
                    }
                }
            })
            .collect();
        debug!(count = records.len(), "receipt list refreshed");
        Ok(records)
    }

    async fn mark_exported(
        &self,
        receipt_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ReceiptRecord, ServerError> {
        let mut record = self.load_for_review(receipt_id).await?;
        let exported_at = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let body = ReceiptPatchModel::from_override(
            &ReceiptOverride::from_record(&record),
            Some(exported_at.clone()),
        );
        self.repository.update_receipt(receipt_id, &body).await?;
        info!(receipt_id, exported_at = %exported_at, "receipt marked as exported");
        record.exported_at = Some(exported_at);
        Ok(record)
    }
}
