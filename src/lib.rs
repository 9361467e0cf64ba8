pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod documents;
pub mod generators;
pub mod metrics;
pub mod models;
pub mod numbering;
pub mod reports;
pub mod storage;
pub mod sync;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{AppConfig, InvoicingError, InvoicingResult};
pub use models::{
    CatalogItem, Document, DocumentStatus, DocumentTotals, DocumentType, LineItem, Report,
    ReportFilter, ReportFormat, Settings, SettingsPatch,
};

pub use auth::Auth;
pub use catalog::Catalog;
pub use documents::Documents;
pub use generators::{CsvGenerator, ExcelGenerator};
pub use numbering::Numbering;
pub use storage::{Collection, FirestoreClient, LocalStore, MemoryRemote, RemoteStore};
pub use sync::SyncEngine;
pub use templates::PrintRenderer;
