//! Where backends put things.
//!
//! Every table is ordered: earlier entries outrank later ones.

/// A logical receipt field and the keys it may appear under.
#[derive(Debug)]
pub(crate) struct FieldAliases {
    pub(crate) name: &'static str,
    pub(crate) aliases: &'static [&'static str],
    /// Alias written alongside `name` when overlaying local values, so the
    /// overlay is found whichever key a probe checks first.
    pub(crate) backend_alias: Option<&'static str>,
}

// Fields.
// ---

pub(crate) const ID: FieldAliases = FieldAliases {
    name: "id",
    aliases: &["receiptId", "receipt_id", "_id"],
    backend_alias: None,
};

pub(crate) const STATUS: FieldAliases = FieldAliases {
    name: "status",
    aliases: &["state", "receiptStatus", "receipt_status"],
    backend_alias: None,
};

/// Processed artifacts are preferred over the original upload.
pub(crate) const IMAGE_URL: FieldAliases = FieldAliases {
    name: "artifacts.processedUrl",
    aliases: &[
        "artifacts.processed_url",
        "processedUrl",
        "processed_url",
        "processedImageUrl",
        "imageUrl",
        "image_url",
        "artifacts.originalUrl",
        "artifacts.original_url",
        "originalUrl",
        "original_url",
    ],
    backend_alias: None,
};

pub(crate) const DATE: FieldAliases = FieldAliases {
    name: "date",
    aliases: &[
        "receiptDate",
        "receipt_date",
        "transactionDate",
        "transaction_date",
        "invoiceDate",
        "invoice_date",
        "date_raw",
        "INVOICE_RECEIPT_DATE",
    ],
    backend_alias: Some("receipt_date"),
};

pub(crate) const TOTAL: FieldAliases = FieldAliases {
    name: "total",
    aliases: &[
        "amount",
        "totalAmount",
        "total_amount",
        "grandTotal",
        "grand_total",
        "total_raw",
        "TOTAL",
        "AMOUNT_PAID",
    ],
    backend_alias: Some("total_amount"),
};

pub(crate) const PAYEE: FieldAliases = FieldAliases {
    name: "payee",
    aliases: &[
        "vendor",
        "merchant",
        "store",
        "storeName",
        "store_name",
        "merchantName",
        "merchant_name",
        "vendorName",
        "vendor_name",
        "VENDOR_NAME",
    ],
    backend_alias: Some("merchant"),
};

pub(crate) const VAT: FieldAliases = FieldAliases {
    name: "vat",
    aliases: &[
        "tax",
        "vatAmount",
        "vat_amount",
        "taxAmount",
        "tax_amount",
        "tax_raw",
        "TAX",
    ],
    backend_alias: Some("vat_amount"),
};

pub(crate) const VAT_RATE: FieldAliases = FieldAliases {
    name: "vatRate",
    aliases: &[
        "vat_rate",
        "taxRate",
        "tax_rate",
        "vatRateRaw",
        "vat_rate_raw",
    ],
    backend_alias: Some("vat_rate"),
};

pub(crate) const CATEGORY: FieldAliases = FieldAliases {
    name: "category",
    aliases: &["categoryId", "category_id", "categoryName", "category_name"],
    backend_alias: Some("category_id"),
};

pub(crate) const NOTES: FieldAliases = FieldAliases {
    name: "notes",
    aliases: &["note", "comment", "comments", "description"],
    backend_alias: Some("note"),
};

pub(crate) const CREATED_AT: FieldAliases = FieldAliases {
    name: "createdAt",
    aliases: &["created_at"],
    backend_alias: None,
};

pub(crate) const UPDATED_AT: FieldAliases = FieldAliases {
    name: "updatedAt",
    aliases: &["updated_at"],
    backend_alias: None,
};

pub(crate) const CONFIRMED_AT: FieldAliases = FieldAliases {
    name: "confirmedAt",
    aliases: &["confirmed_at"],
    backend_alias: None,
};

pub(crate) const EXPORTED_AT: FieldAliases = FieldAliases {
    name: "exportedAt",
    aliases: &["exported_at", "ynabExportedAt", "ynab_exported_at"],
    backend_alias: None,
};

/// Fields a local edit (or a list row) may overlay onto a fresh read.
pub(crate) const OVERLAY_FIELDS: &[&FieldAliases] =
    &[&PAYEE, &DATE, &TOTAL, &VAT, &VAT_RATE, &CATEGORY, &NOTES, &STATUS];

// Locations.
// ---

/// Prefixes probed, for each candidate key, inside a section.
pub(crate) const PROBE_LOCATIONS: &[&str] = &["summary.fields", "fields", ""];

/// Envelopes some endpoints wrap a single record in.
pub(crate) const RECORD_WRAPPERS: &[&str] = &["receipt", "data", "item", "record"];

pub(crate) const CONFIRMED_SECTION: &[&str] = &[
    "confirmed",
    "final",
    "confirmedFields",
    "confirmed_fields",
    "finalFields",
    "final_fields",
];

pub(crate) const DRAFT_SECTION: &[&str] = &[
    "draft",
    "draftFields",
    "draft_fields",
    "userEdited",
    "user_edited",
    "edited",
    "edits",
];

pub(crate) const EXTRACTED_SECTION: &[&str] = &[
    "ocrSummary",
    "ocr_summary",
    "ocr.summary",
    "extracted",
    "extractedFields",
    "extracted_fields",
    "ocrFields",
    "ocr_fields",
    "ocr.fields",
    "inferred",
    "summary",
    "ocr",
];

/// Keys a list response may carry its rows under.
pub(crate) const LIST_WRAPPERS: &[&str] = &["items", "receipts", "results", "data.items", "data"];
