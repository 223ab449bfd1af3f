use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_json::Value;

/// Transport to the receipts backend, implemented by the host application
/// (authentication, retries and timeouts live there).
///
/// Paths are relative to the API root, e.g. `receipts` or `receipts/{id}`.
#[async_trait]
pub trait ReceiptsApiDatasource: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ServerError>;

    async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ServerError>;

    async fn delete(&self, path: &str) -> Result<(), ServerError>;
}
