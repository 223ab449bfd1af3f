use fractic_server_error::ServerError;

use crate::{entities::ReceiptRecord, errors::CsvExportError};

const HEADER: [&str; 9] = [
    "id", "date", "payee", "total", "vat", "vat_rate", "category", "notes", "status",
];

/// Flat CSV of canonical records, one row per receipt, in the given order.
pub struct ReceiptCsvExporter;

impl ReceiptCsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, records: &[ReceiptRecord]) -> Result<String, ServerError> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .write_record(HEADER)
            .map_err(|e| CsvExportError::with_debug("header", &e))?;
        for record in records {
            writer
                .write_record(Self::row(record))
                .map_err(|e| CsvExportError::with_debug(&record.id, &e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CsvExportError::with_debug("flush", &e))?;
        String::from_utf8(bytes).map_err(|e| CsvExportError::with_debug("encoding", &e))
    }

    fn row(record: &ReceiptRecord) -> [String; 9] {
        let amount = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
        [
            record.id.clone(),
            record.date_string(),
            record.payee.clone(),
            amount(record.total),
            amount(record.vat),
            record.vat_rate.as_str().to_string(),
            record.category.clone(),
            record.notes.clone(),
            record.status.as_str().to_string(),
        ]
    }
}

impl Default for ReceiptCsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
