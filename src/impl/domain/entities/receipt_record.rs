use chrono::NaiveDate;
use serde::Serializer;
use serde_derive::{Deserialize, Serialize};

/// Lifecycle stage of a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptStatus {
    Created,
    Extracted,
    Draft,
    /// Also the value of a receipt whose status could not be resolved.
    #[default]
    PendingReview,
    Confirmed,
    Failed,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Created => "CREATED",
            ReceiptStatus::Extracted => "EXTRACTED",
            ReceiptStatus::Draft => "DRAFT",
            ReceiptStatus::PendingReview => "PENDING_REVIEW",
            ReceiptStatus::Confirmed => "CONFIRMED",
            ReceiptStatus::Failed => "FAILED",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, ReceiptStatus::Confirmed)
    }
}

/// Closed set of VAT rates a receipt can be booked with (Italian rates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VatRate {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
    #[default]
    #[serde(rename = "22")]
    TwentyTwo,
}

impl VatRate {
    pub const ALL: [VatRate; 5] = [
        VatRate::Zero,
        VatRate::Four,
        VatRate::Five,
        VatRate::Ten,
        VatRate::TwentyTwo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VatRate::Zero => "0",
            VatRate::Four => "4",
            VatRate::Five => "5",
            VatRate::Ten => "10",
            VatRate::TwentyTwo => "22",
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            VatRate::Zero => 0.0,
            VatRate::Four => 4.0,
            VatRate::Five => 5.0,
            VatRate::Ten => 10.0,
            VatRate::TwentyTwo => 22.0,
        }
    }

    /// Exact match against the bucket spellings ("0", "4", "5", "10", "22").
    pub fn from_bucket_str(s: &str) -> Option<VatRate> {
        VatRate::ALL.into_iter().find(|rate| rate.as_str() == s)
    }

    /// Snaps an arbitrary percentage to the nearest bucket.
    pub fn snap(percent: f64) -> VatRate {
        match percent {
            p if p <= 2.0 => VatRate::Zero,
            p if p <= 4.5 => VatRate::Four,
            p if p <= 7.0 => VatRate::Five,
            p if p <= 15.0 => VatRate::Ten,
            _ => VatRate::TwentyTwo,
        }
    }
}

/// Canonical representation of a receipt, produced by normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub id: String,
    pub status: ReceiptStatus,
    pub image_url: Option<String>,
    /// `None` when unresolved; serialized as an empty string.
    #[serde(serialize_with = "serialize_optional_date")]
    pub date: Option<NaiveDate>,
    pub total: Option<f64>,
    pub payee: String,
    pub vat: Option<f64>,
    pub vat_rate: VatRate,
    pub category: String,
    pub notes: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub confirmed_at: Option<String>,
    pub exported_at: Option<String>,
}

impl ReceiptRecord {
    /// ISO calendar date, or an empty string if the date is unresolved.
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

fn serialize_optional_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_str(""),
    }
}
