// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod list_snapshot_datasource;
        pub(crate) mod local_storage_datasource;
        pub(crate) mod override_store_datasource;
        pub(crate) mod receipts_api_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod amount_model;
        pub(crate) mod expense_summary_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod receipt_patch_model;
        pub(crate) mod receipt_status_model;
        pub(crate) mod vat_rate_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod receipts_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod receipt_override;
        pub(crate) mod receipt_record;
    }
    pub(crate) mod logic {
        pub(crate) mod alias_tables;
        pub(crate) mod field_extractor;
        pub(crate) mod payload_overlay;
        pub(crate) mod response_normalizer;
    }
    pub(crate) mod repositories {
        pub(crate) mod receipts_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod review_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod expense_report_printer;
    pub(crate) mod receipt_csv_exporter;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::receipt_override::*;
        pub use crate::domain::entities::receipt_record::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::list_snapshot_datasource::ListSnapshotCache;
        pub use crate::data::datasources::local_storage_datasource::{
            FileLocalStorage, InMemoryLocalStorage, LocalStorage,
        };
        pub use crate::data::datasources::override_store_datasource::{
            LocalOverrideStore, OverrideStore,
        };
        pub use crate::data::datasources::receipts_api_datasource::ReceiptsApiDatasource;
    }

    pub mod usecases {
        pub use crate::domain::usecases::review_usecase::ReviewUsecase;
    }

    pub use crate::domain::logic::response_normalizer::normalize;
    pub use crate::presentation::expense_report_printer::ExpenseReportPrinter;
    pub use crate::presentation::receipt_csv_exporter::ReceiptCsvExporter;
}
