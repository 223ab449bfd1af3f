use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_json::Value;

use crate::data::models::receipt_patch_model::ReceiptPatchModel;

/// Backend reads return the raw payload; shaping it is the normalizer's job.
#[async_trait]
pub(crate) trait ReceiptsRepository: Send + Sync {
    async fn fetch_receipt(&self, receipt_id: &str) -> Result<Value, ServerError>;

    async fn fetch_receipt_list(&self) -> Result<Value, ServerError>;

    async fn update_receipt(
        &self,
        receipt_id: &str,
        patch: &ReceiptPatchModel,
    ) -> Result<Value, ServerError>;

    async fn delete_receipt(&self, receipt_id: &str) -> Result<(), ServerError>;
}
