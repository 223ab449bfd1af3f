use std::str::FromStr;

use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{entities::ReceiptStatus, errors::InvalidReceiptStatus};

/// Receipt status as spelled by the various backend generations.
#[derive(Debug)]
pub(crate) struct ReceiptStatusModel(ReceiptStatus);
impl FromStr for ReceiptStatusModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        let status = match key.as_str() {
            "NEW" | "CREATED" | "UPLOADED" => ReceiptStatus::Created,
            "OCR_DONE" | "PROCESSED" | "EXTRACTED" => ReceiptStatus::Extracted,
            "DRAFT" => ReceiptStatus::Draft,
            "PENDING" | "PENDING_REVIEW" | "REVIEW" => ReceiptStatus::PendingReview,
            "CONFIRMED" => ReceiptStatus::Confirmed,
            "FAILED" | "ERROR" => ReceiptStatus::Failed,
            _ => return Err(InvalidReceiptStatus::new(s)),
        };
        Ok(ReceiptStatusModel(status))
    }
}

impl ReceiptStatusModel {
    pub(crate) fn from_value(value: &Value) -> Option<ReceiptStatus> {
        value
            .as_str()
            .and_then(|s| ReceiptStatusModel::from_str(s).ok())
            .map(Into::into)
    }
}

impl From<ReceiptStatusModel> for ReceiptStatus {
    fn from(model: ReceiptStatusModel) -> Self {
        model.0
    }
}
