//! Document lifecycle integration tests: create, save, finalize, void, reissue.

mod common;

use common::{create_document, test_store};
use oasis_invoicing::{
    DocumentStatus, DocumentType, Documents, InvoicingError, LineItem, Numbering,
};

#[tokio::test]
async fn new_document_takes_prefix_number_and_default_tax() {
    let store = test_store().await;
    let doc = Documents::new(&store).create(DocumentType::Invoice).await.unwrap();

    assert_eq!(doc.prefix, "FAC-");
    assert_eq!(doc.number, 1);
    assert_eq!(doc.display_number(), "FAC-1");
    assert_eq!(doc.tax_pct, 11.5);
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert!(doc.lines.is_empty());
}

#[tokio::test]
async fn saving_keeps_the_assigned_number() {
    let store = test_store().await;
    let documents = Documents::new(&store);
    let mut doc = documents.create(DocumentType::Quote).await.unwrap();

    doc.number = 99;
    doc.prefix = "X-".to_string();
    doc.client = "Ana Rivera".to_string();
    let saved = documents.save(doc).await.unwrap();

    assert_eq!(saved.display_number(), "COT-1");
    assert_eq!(saved.client, "Ana Rivera");
    assert_eq!(documents.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn changing_type_on_save_is_rejected() {
    let store = test_store().await;
    let documents = Documents::new(&store);
    let mut doc = documents.create(DocumentType::Quote).await.unwrap();

    doc.doc_type = DocumentType::Invoice;
    let err = documents.save(doc).await.unwrap_err();
    assert!(matches!(err, InvoicingError::Validation(_)));
}

#[tokio::test]
async fn totals_round_each_step() {
    let store = test_store().await;
    let mut doc = create_document(
        &store,
        DocumentType::Invoice,
        "Taller Pérez",
        "2026-03-10",
        vec![LineItem::new("Filtro", 40.0, 2.0), LineItem::new("Aceite", 12.5, 2.0)],
    )
    .await;
    doc.discount_pct = 10.0;
    let documents = Documents::new(&store);
    let doc = documents.save(doc).await.unwrap();

    let totals = documents.totals(&doc.id).await.unwrap();
    assert_eq!(totals.subtotal, 105.0);
    assert_eq!(totals.discount_amount, 10.5);
    assert_eq!(totals.tax_amount, 10.87);
    assert_eq!(totals.total, 105.37);
}

#[tokio::test]
async fn invalid_discount_is_rejected() {
    let store = test_store().await;
    let documents = Documents::new(&store);
    let mut doc = documents.create(DocumentType::Invoice).await.unwrap();

    doc.discount_pct = 150.0;
    let err = documents.save(doc).await.unwrap_err();
    assert!(matches!(err, InvoicingError::Validation(_)));
}

#[tokio::test]
async fn finalize_and_void_change_status_only() {
    let store = test_store().await;
    let documents = Documents::new(&store);
    let doc = documents.create(DocumentType::Invoice).await.unwrap();

    let finalized = documents.finalize(&doc.id).await.unwrap();
    assert_eq!(finalized.status, DocumentStatus::Final);

    let voided = documents.void(&doc.id).await.unwrap();
    assert_eq!(voided.status, DocumentStatus::Voided);
    assert_eq!(voided.number, doc.number);
    assert!(documents.get(&doc.id).await.unwrap().is_voided());
}

#[tokio::test]
async fn reissue_converts_quote_into_next_invoice() {
    let store = test_store().await;
    let documents = Documents::new(&store);
    Numbering::new(&store)
        .set_counter(DocumentType::Invoice, 17.0)
        .await
        .unwrap();

    let quote = documents.create(DocumentType::Quote).await.unwrap();
    let invoice = documents
        .reissue(&quote.id, Some(DocumentType::Invoice))
        .await
        .unwrap();

    assert_eq!(invoice.id, quote.id);
    assert_eq!(invoice.doc_type, DocumentType::Invoice);
    assert_eq!(invoice.display_number(), "FAC-17");

    let same_type = documents.reissue(&quote.id, None).await.unwrap();
    assert_eq!(same_type.display_number(), "FAC-18");
}

#[tokio::test]
async fn missing_documents_are_not_found() {
    let store = test_store().await;
    let documents = Documents::new(&store);

    assert!(matches!(
        documents.get("missing").await.unwrap_err(),
        InvoicingError::NotFound(_)
    ));
    assert!(matches!(
        documents.delete("missing").await.unwrap_err(),
        InvoicingError::NotFound(_)
    ));
}

#[tokio::test]
async fn list_returns_newest_first() {
    let store = test_store().await;
    let documents = Documents::new(&store);

    let first = documents.create(DocumentType::Quote).await.unwrap();
    let second = documents.create(DocumentType::Invoice).await.unwrap();
    let third = documents.create(DocumentType::Quote).await.unwrap();

    // Guardar de nuevo no cambia la posición
    documents.save(first.clone()).await.unwrap();

    let ids: Vec<String> = documents.list().await.unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}
