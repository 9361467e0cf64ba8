//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use oasis_invoicing::{Document, DocumentType, Documents, LineItem, LocalStore};

/// Fresh in-memory store with first-run defaults applied.
pub async fn test_store() -> LocalStore {
    LocalStore::in_memory()
        .await
        .expect("Failed to open in-memory store")
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("Invalid test date")
}

/// Creates a numbered document with the given lines and saves it.
pub async fn create_document(
    store: &LocalStore,
    doc_type: DocumentType,
    client: &str,
    on: &str,
    lines: Vec<LineItem>,
) -> Document {
    let documents = Documents::new(store);
    let mut doc = documents
        .create(doc_type)
        .await
        .expect("Failed to create document");

    doc.client = client.to_string();
    doc.date = date(on);
    doc.lines = lines;

    documents.save(doc).await.expect("Failed to save document")
}
