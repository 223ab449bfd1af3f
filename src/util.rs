use std::path::Path;

use chrono::{DateTime, Utc};
use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    config::ReconcilerConfig,
    data::{
        datasources::{
            list_snapshot_datasource::ListSnapshotCache, local_storage_datasource::LocalStorage,
            override_store_datasource::LocalOverrideStore,
            receipts_api_datasource::ReceiptsApiDatasource,
        },
        repositories::receipts_repository_impl::ReceiptsRepositoryImpl,
    },
    domain::{
        logic::response_normalizer,
        usecases::review_usecase::{ReviewUsecase as _, ReviewUsecaseImpl},
    },
    entities::{ReceiptOverride, ReceiptRecord},
    errors::ExportWriteError,
    presentation::{
        expense_report_printer::ExpenseReportPrinter, receipt_csv_exporter::ReceiptCsvExporter,
    },
};

pub type Report = String;

pub struct ReceiptReconcilerUtil<A, S>
where
    A: ReceiptsApiDatasource,
    S: LocalStorage,
{
    review_usecase: ReviewUsecaseImpl<ReceiptsRepositoryImpl<A>, LocalOverrideStore<S>>,
    csv_exporter: ReceiptCsvExporter,
    printer: ExpenseReportPrinter,
}

impl<A, S> ReceiptReconcilerUtil<A, S>
where
    A: ReceiptsApiDatasource,
    S: LocalStorage,
{
    pub fn new(config: &ReconcilerConfig, api: A, storage: S) -> Result<Self, ServerError> {
        Ok(Self {
            review_usecase: ReviewUsecaseImpl::new(
                ReceiptsRepositoryImpl::new(api),
                LocalOverrideStore::new(storage, &config.key_prefix, &config.origin),
            ),
            csv_exporter: ReceiptCsvExporter::new(),
            printer: ExpenseReportPrinter::new(config.iso_currency()?),
        })
    }

    pub fn normalize(&self, raw: &Value) -> Result<ReceiptRecord, ServerError> {
        response_normalizer::normalize(raw)
    }

    pub async fn load_for_review(&self, receipt_id: &str) -> Result<ReceiptRecord, ServerError> {
        self.review_usecase.load_for_review(receipt_id).await
    }

    pub async fn save(&self, receipt_id: &str, patch: ReceiptOverride) -> Result<(), ServerError> {
        self.review_usecase.save(receipt_id, patch).await
    }

    pub async fn delete(&self, receipt_id: &str) -> Result<(), ServerError> {
        self.review_usecase.delete(receipt_id).await
    }

    pub async fn refresh_list(&self) -> Result<Vec<ReceiptRecord>, ServerError> {
        self.review_usecase.refresh_list().await
    }

    pub async fn mark_exported(
        &self,
        receipt_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ReceiptRecord, ServerError> {
        self.review_usecase.mark_exported(receipt_id, at).await
    }

    pub fn overrides(&self) -> &LocalOverrideStore<S> {
        self.review_usecase.overrides()
    }

    pub fn snapshots(&self) -> &ListSnapshotCache {
        self.review_usecase.snapshots()
    }

    pub fn export_csv(&self, records: &[ReceiptRecord]) -> Result<String, ServerError> {
        self.csv_exporter.export(records)
    }

    pub async fn write_csv_export<P>(
        &self,
        records: &[ReceiptRecord],
        path: P,
    ) -> Result<(), ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let csv = self.export_csv(records)?;
        let path = path.as_ref();
        tokio::fs::write(path, csv)
            .await
            .map_err(|e| ExportWriteError::with_debug(&path.display().to_string(), &e))
    }

    pub fn print_report(&self, records: &[ReceiptRecord]) -> Report {
        self.printer.print_report(records)
    }
}
