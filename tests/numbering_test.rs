//! Document numbering integration tests.

mod common;

use common::test_store;
use oasis_invoicing::{DocumentType, Numbering, SettingsPatch};

#[tokio::test]
async fn counters_start_at_one_and_are_independent_per_type() {
    let store = test_store().await;
    let numbering = Numbering::new(&store);

    assert_eq!(numbering.next(DocumentType::Invoice).await.unwrap(), 1);
    assert_eq!(numbering.next(DocumentType::Invoice).await.unwrap(), 2);
    assert_eq!(numbering.next(DocumentType::Quote).await.unwrap(), 1);

    assert_eq!(numbering.counter(DocumentType::Invoice).await.unwrap(), 3);
    assert_eq!(numbering.counter(DocumentType::Quote).await.unwrap(), 2);
}

#[tokio::test]
async fn manual_counter_below_one_is_stored_as_one() {
    let store = test_store().await;
    let numbering = Numbering::new(&store);

    numbering.set_counter(DocumentType::Invoice, 0.0).await.unwrap();
    assert_eq!(numbering.counter(DocumentType::Invoice).await.unwrap(), 1);

    numbering.set_counter(DocumentType::Invoice, f64::NAN).await.unwrap();
    assert_eq!(numbering.next(DocumentType::Invoice).await.unwrap(), 1);
}

#[tokio::test]
async fn manual_counter_sets_the_next_number() {
    let store = test_store().await;
    let numbering = Numbering::new(&store);

    numbering.set_counter(DocumentType::Quote, 250.7).await.unwrap();
    assert_eq!(numbering.next(DocumentType::Quote).await.unwrap(), 250);
    assert_eq!(numbering.next(DocumentType::Quote).await.unwrap(), 251);
}

#[tokio::test]
async fn empty_prefix_falls_back_to_the_default() {
    let store = test_store().await;
    let numbering = Numbering::new(&store);

    numbering.set_prefix(DocumentType::Invoice, "").await.unwrap();
    assert_eq!(numbering.prefix(DocumentType::Invoice).await.unwrap(), "FAC-");

    numbering.set_prefix(DocumentType::Invoice, "F2026-").await.unwrap();
    assert_eq!(numbering.prefix(DocumentType::Invoice).await.unwrap(), "F2026-");
}

#[tokio::test]
async fn settings_reflect_numbering_state() {
    let store = test_store().await;
    let numbering = Numbering::new(&store);
    numbering.next(DocumentType::Invoice).await.unwrap();

    let patch: SettingsPatch = serde_json::from_value(serde_json::json!({
        "prefixes": { "COT": "Q-" },
        "counters": { "COT": "40" }
    }))
    .unwrap();
    let settings = store.update_settings(&patch).await.unwrap();

    assert_eq!(settings.counters[&DocumentType::Invoice], 2);
    assert_eq!(settings.counters[&DocumentType::Quote], 40);
    assert_eq!(settings.prefixes[&DocumentType::Quote], "Q-");
    assert_eq!(numbering.next(DocumentType::Quote).await.unwrap(), 40);
}
