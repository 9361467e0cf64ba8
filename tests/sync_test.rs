//! Sync engine integration tests against the in-memory remote.

mod common;

use common::{create_document, test_store};
use oasis_invoicing::{
    Catalog, CatalogItem, Collection, DocumentType, Documents, LineItem, MemoryRemote,
    RemoteStore, SyncEngine,
};
use serde_json::json;

#[tokio::test]
async fn push_writes_every_record_with_updated_at() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    let doc = create_document(&store, DocumentType::Invoice, "Ana", "2026-02-01", vec![LineItem::new("x", 10.0, 1.0)]).await;

    let report = SyncEngine::new(&store, &remote).push().await.unwrap();

    // One document plus the two seeded catalog items
    assert_eq!(report.pushed, 3);
    assert_eq!(report.failed, 0);

    let record = remote.get(Collection::Documents, &doc.id).await.unwrap();
    assert_eq!(record["client"], "Ana");
    assert_eq!(record["type"], "FAC");
    assert!(record["updatedAt"].is_string());
    assert_eq!(remote.len(Collection::Items).await, 2);
}

#[tokio::test]
async fn push_merges_into_existing_remote_fields() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    let doc = Documents::new(&store).create(DocumentType::Quote).await.unwrap();

    remote
        .upsert(Collection::Documents, &doc.id, &json!({ "id": doc.id, "sharedWith": "contabilidad" }))
        .await
        .unwrap();
    SyncEngine::new(&store, &remote).push().await.unwrap();

    let record = remote.get(Collection::Documents, &doc.id).await.unwrap();
    assert_eq!(record["sharedWith"], "contabilidad");
    assert_eq!(record["number"], 1);
}

#[tokio::test]
async fn failed_writes_are_counted_and_skipped() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    let first = Documents::new(&store).create(DocumentType::Invoice).await.unwrap();
    let second = Documents::new(&store).create(DocumentType::Invoice).await.unwrap();
    remote.fail_writes_for(&first.id).await;

    let report = SyncEngine::new(&store, &remote).push().await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.pushed, 3);
    assert!(remote.get(Collection::Documents, &first.id).await.is_none());
    assert!(remote.get(Collection::Documents, &second.id).await.is_some());
}

#[tokio::test]
async fn pull_overwrites_local_records_by_id() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    let doc = Documents::new(&store).create(DocumentType::Invoice).await.unwrap();

    remote
        .upsert(
            Collection::Documents,
            &doc.id,
            &json!({
                "id": doc.id,
                "type": "FAC",
                "prefix": "FAC-",
                "number": "7",
                "date": "2026-04-01",
                "client": "Desde la nube",
                "lines": [{ "name": "Servicio", "price": "15.5", "qty": "" }],
                "status": "final"
            }),
        )
        .await
        .unwrap();
    remote
        .upsert(Collection::Documents, "broken", &json!({ "id": "broken", "lines": "not-a-list" }))
        .await
        .unwrap();

    let report = SyncEngine::new(&store, &remote).pull().await.unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.skipped, 1);

    let local = Documents::new(&store).get(&doc.id).await.unwrap();
    assert_eq!(local.client, "Desde la nube");
    assert_eq!(local.number, 7);
    assert_eq!(local.lines[0].qty, 1.0);
    assert_eq!(local.totals().subtotal, 15.5);
}

#[tokio::test]
async fn pull_keeps_documents_with_a_blank_date() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    remote
        .upsert(
            Collection::Documents,
            "d1",
            &json!({
                "id": "d1",
                "type": "FAC",
                "number": 1712345678901u64,
                "date": "",
                "client": "Ana",
                "lines": []
            }),
        )
        .await
        .unwrap();

    let report = SyncEngine::new(&store, &remote).pull().await.unwrap();
    assert_eq!(report.documents, 1);
    assert_eq!(report.skipped, 0);

    let local = Documents::new(&store).get("d1").await.unwrap();
    assert_eq!(local.client, "Ana");
    assert_eq!(local.date, chrono::Local::now().date_naive());
}

#[tokio::test]
async fn deleted_item_reappears_after_pull() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    let catalog = Catalog::new(&store);
    let item = catalog
        .add(CatalogItem::new("Lavado", "Completo", 35.0))
        .await
        .unwrap();

    let engine = SyncEngine::new(&store, &remote);
    engine.push().await.unwrap();
    catalog.delete(&item.id).await.unwrap();
    assert!(catalog.list().await.unwrap().iter().all(|i| i.id != item.id));

    engine.pull().await.unwrap();
    assert!(catalog.list().await.unwrap().iter().any(|i| i.id == item.id));
}

#[tokio::test]
async fn run_pulls_before_pushing() {
    let store = test_store().await;
    let remote = MemoryRemote::new();
    remote
        .upsert(Collection::Items, "remote-1", &json!({ "id": "remote-1", "name": "Remoto", "price": 5 }))
        .await
        .unwrap();

    let report = SyncEngine::new(&store, &remote).run().await.unwrap();

    assert_eq!(report.pull.items, 1);
    assert_eq!(report.push.pushed, 3);
    let record = remote.get(Collection::Items, "remote-1").await.unwrap();
    assert!(record["updatedAt"].is_string());
}
