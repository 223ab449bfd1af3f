use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ConfigReadError, "Error reading configuration file.");
define_internal_error!(
    StorageReadError,
    "Error reading local storage at '{location}'.",
    { location: &str }
);
define_internal_error!(
    StorageWriteError,
    "Error writing local storage at '{location}'.",
    { location: &str }
);
define_client_error!(ExportWriteError, "Error writing export file '{path}'.", { path: &str });

// Parsing-related.
define_client_error!(InvalidConfig, "Invalid reconciler configuration (invalid RON format).");
define_client_error!(InvalidIsoCurrencyCode, "Invalid ISO currency code: {code}.", { code: &str });
define_client_error!(InvalidAmount, "Invalid amount: '{value}'.", { value: &str });
define_client_error!(InvalidReceiptDate, "Invalid receipt date: '{date}'.", { date: &str });
define_client_error!(InvalidVatRate, "Invalid VAT rate: '{value}'.", { value: &str });
define_client_error!(InvalidReceiptStatus, "Invalid receipt status: '{value}'.", { value: &str });

// Normalization-related.
define_client_error!(InvalidRecord, "Invalid receipt record: {details}.", { details: &str });

// Backend-related.
define_internal_error!(
    FetchFailed,
    "Backend request failed for receipt '{receipt_id}'.",
    { receipt_id: &str }
);
define_internal_error!(ListFetchFailed, "Backend request failed for receipt list.");

// Export-related.
define_internal_error!(CsvExportError, "Error writing CSV export: {details}.", { details: &str });
