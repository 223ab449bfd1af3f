use async_trait::async_trait;
use fractic_server_error::ServerError;
use serde_json::Value;
use tracing::debug;

use crate::{
    data::{
        datasources::receipts_api_datasource::ReceiptsApiDatasource,
        models::receipt_patch_model::ReceiptPatchModel,
    },
    domain::repositories::receipts_repository::ReceiptsRepository,
    errors::{FetchFailed, ListFetchFailed},
};

const RECEIPTS_PATH: &str = "receipts";

pub(crate) struct ReceiptsRepositoryImpl<A: ReceiptsApiDatasource> {
    api: A,
}

impl<A: ReceiptsApiDatasource> ReceiptsRepositoryImpl<A> {
    pub(crate) fn new(api: A) -> Self {
        Self { api }
    }

    fn receipt_path(receipt_id: &str) -> String {
        format!("{RECEIPTS_PATH}/{receipt_id}")
    }
}

#[async_trait]
impl<A: ReceiptsApiDatasource> ReceiptsRepository for ReceiptsRepositoryImpl<A> {
    async fn fetch_receipt(&self, receipt_id: &str) -> Result<Value, ServerError> {
        self.api
            .get_json(&Self::receipt_path(receipt_id))
            .await
            .map_err(|e| FetchFailed::with_debug(receipt_id, &e))
    }

    async fn fetch_receipt_list(&self) -> Result<Value, ServerError> {
        self.api
            .get_json(RECEIPTS_PATH)
            .await
            .map_err(|e| ListFetchFailed::with_debug(&e))
    }

    async fn update_receipt(
        &self,
        receipt_id: &str,
        patch: &ReceiptPatchModel,
    ) -> Result<Value, ServerError> {
        let body = patch.to_json();
        debug!(receipt_id, body = %body, "updating receipt");
        self.api
            .put_json(&Self::receipt_path(receipt_id), &body)
            .await
            .map_err(|e| FetchFailed::with_debug(receipt_id, &e))
    }

    async fn delete_receipt(&self, receipt_id: &str) -> Result<(), ServerError> {
        self.api
            .delete(&Self::receipt_path(receipt_id))
            .await
            .map_err(|e| FetchFailed::with_debug(receipt_id, &e))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::{entities::ReceiptOverride, errors::InvalidRecord};

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingApi {
        fn record(&self, method: &str, path: &str) -> Result<(), ServerError> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), path.to_string()));
            if self.fail {
                return Err(InvalidRecord::new("backend down"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ReceiptsApiDatasource for RecordingApi {
        async fn get_json(&self, path: &str) -> Result<Value, ServerError> {
            self.record("GET", path)?;
            Ok(json!({ "path": path }))
        }

        async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ServerError> {
            self.record("PUT", path)?;
            Ok(body.clone())
        }

        async fn delete(&self, path: &str) -> Result<(), ServerError> {
            self.record("DELETE", path)
        }
    }

    #[tokio::test]
    async fn requests_use_receipt_paths() {
        let repository = ReceiptsRepositoryImpl::new(RecordingApi::default());
        repository.fetch_receipt_list().await.unwrap();
        repository.fetch_receipt("r1").await.unwrap();
        let patch = ReceiptPatchModel::from_override(
            &ReceiptOverride { total: Some(5.0), ..ReceiptOverride::new("r1") },
            None,
        );
        let echoed = repository.update_receipt("r1", &patch).await.unwrap();
        assert_eq!(echoed, json!({ "total": 5.0 }));
        repository.delete_receipt("r1").await.unwrap();

        let calls = repository.api.calls.lock().unwrap().clone();
        let expected = [
            ("GET", "receipts"),
            ("GET", "receipts/r1"),
            ("PUT", "receipts/r1"),
            ("DELETE", "receipts/r1"),
        ];
        assert_eq!(
            calls,
            expected
                .iter()
                .map(|(m, p)| (m.to_string(), p.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn transport_failures_are_reported_as_fetch_failures() {
        let repository = ReceiptsRepositoryImpl::new(RecordingApi {
            fail: true,
            ..Default::default()
        });
        assert!(repository.fetch_receipt("r9").await.is_err());
        assert!(repository.fetch_receipt_list().await.is_err());
        assert!(repository.delete_receipt("r9").await.is_err());
    }
}
