//! Reporting integration tests over the local store.

mod common;

use common::{create_document, date, test_store};
use oasis_invoicing::models::ReportFilter;
use oasis_invoicing::{reports, DocumentType, Documents, InvoicingError, LineItem, ReportFormat};

#[tokio::test]
async fn report_filters_range_and_skips_voided() {
    let store = test_store().await;
    create_document(&store, DocumentType::Invoice, "A", "2026-01-31", vec![LineItem::new("x", 10.0, 1.0)]).await;
    create_document(&store, DocumentType::Invoice, "B", "2026-02-01", vec![LineItem::new("x", 20.0, 1.0)]).await;
    create_document(&store, DocumentType::Quote, "C", "2026-02-28", vec![LineItem::new("x", 30.0, 1.0)]).await;
    let voided =
        create_document(&store, DocumentType::Invoice, "D", "2026-02-15", vec![LineItem::new("x", 99.0, 1.0)]).await;
    Documents::new(&store).void(&voided.id).await.unwrap();

    let filter = ReportFilter {
        from: Some(date("2026-02-01")),
        to: Some(date("2026-02-28")),
        doc_type: None,
    };
    let report = reports::build(&store, &filter).await.unwrap();

    let clients: Vec<&str> = report.rows.iter().map(|r| r.client.as_str()).collect();
    assert_eq!(clients, vec!["C", "B"]);
    assert_eq!(report.summary.count, 2);
    assert_eq!(report.summary.total, 55.75);
    assert_eq!(report.summary.by_type[&DocumentType::Quote], 33.45);
}

#[tokio::test]
async fn report_can_filter_by_type() {
    let store = test_store().await;
    create_document(&store, DocumentType::Invoice, "A", "2026-02-01", vec![LineItem::new("x", 10.0, 1.0)]).await;
    create_document(&store, DocumentType::Quote, "B", "2026-02-01", vec![LineItem::new("x", 10.0, 1.0)]).await;

    let filter = ReportFilter {
        doc_type: Some(DocumentType::Quote),
        ..Default::default()
    };
    let report = reports::build(&store, &filter).await.unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].number, "COT-1");
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let store = test_store().await;
    let filter = ReportFilter {
        from: Some(date("2026-03-01")),
        to: Some(date("2026-02-01")),
        doc_type: None,
    };

    let err = reports::build(&store, &filter).await.unwrap_err();
    assert!(matches!(err, InvoicingError::Validation(_)));
}

#[tokio::test]
async fn csv_export_has_header_and_one_line_per_row() {
    let store = test_store().await;
    create_document(&store, DocumentType::Invoice, "A", "2026-02-01", vec![LineItem::new("x", 10.0, 1.0)]).await;

    let report = reports::build(&store, &ReportFilter::default()).await.unwrap();
    let export = reports::export(report, ReportFormat::Csv).await.unwrap();

    assert!(export.content_type.starts_with("text/csv"));
    assert!(export.filename.ends_with(".csv"));
    let text = String::from_utf8(export.body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("type,number,date"));
    assert!(lines[1].starts_with("FAC,FAC-1,2026-02-01,A"));
}
