use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

pub static DOCUMENTS_SAVED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("oasis_documents_saved_total", "Documentos guardados")
        .expect("Failed to register oasis_documents_saved_total")
});

pub static NUMBERS_ISSUED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "oasis_numbers_issued_total",
        "Números asignados por tipo de documento",
        &["doc_type"]
    )
    .expect("Failed to register oasis_numbers_issued_total")
});

pub static SYNC_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "oasis_sync_records_total",
        "Registros sincronizados por dirección y resultado",
        &["direction", "outcome"]
    )
    .expect("Failed to register oasis_sync_records_total")
});
