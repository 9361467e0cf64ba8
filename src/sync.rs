//! Sincronización entre el almacén local y el remoto.
//!
//! Pull: lo remoto sobrescribe lo local por id. Push: todo lo local se
//! escribe en remoto por id, con merge y sello `updatedAt`. No hay
//! propagación de borrados ni resolución de conflictos: gana la última
//! escritura.

use chrono::Utc;
use serde::Serialize;

use crate::core::InvoicingResult;
use crate::metrics;
use crate::models::{CatalogItem, Document};
use crate::storage::{Collection, LocalStore, RemoteStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PullReport {
    pub documents: usize,
    pub items: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushReport {
    pub pushed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub pull: PullReport,
    pub push: PushReport,
}

pub struct SyncEngine<'a> {
    store: &'a LocalStore,
    remote: &'a dyn RemoteStore,
}

impl<'a> SyncEngine<'a> {
    pub fn new(store: &'a LocalStore, remote: &'a dyn RemoteStore) -> Self {
        Self { store, remote }
    }

    /// Pull seguido de push, en ese orden.
    pub async fn run(&self) -> InvoicingResult<SyncReport> {
        let pull = self.pull().await?;
        let push = self.push().await?;
        Ok(SyncReport { pull, push })
    }

    pub async fn pull(&self) -> InvoicingResult<PullReport> {
        let mut report = PullReport::default();

        for record in self.remote.list(Collection::Documents).await? {
            match serde_json::from_value::<Document>(record) {
                Ok(doc) => {
                    self.store.save_document(&doc).await?;
                    report.documents += 1;
                }
                Err(e) => {
                    tracing::warn!("Documento remoto ilegible, se omite: {}", e);
                    report.skipped += 1;
                }
            }
        }

        for record in self.remote.list(Collection::Items).await? {
            match serde_json::from_value::<CatalogItem>(record) {
                Ok(item) => {
                    self.store.save_catalog_item(&item).await?;
                    report.items += 1;
                }
                Err(e) => {
                    tracing::warn!("Artículo remoto ilegible, se omite: {}", e);
                    report.skipped += 1;
                }
            }
        }

        metrics::SYNC_RECORDS
            .with_label_values(&["pull", "ok"])
            .inc_by((report.documents + report.items) as u64);
        metrics::SYNC_RECORDS
            .with_label_values(&["pull", "skipped"])
            .inc_by(report.skipped as u64);

        tracing::info!(
            documents = report.documents,
            items = report.items,
            skipped = report.skipped,
            "Descarga desde remoto completada"
        );
        Ok(report)
    }

    /// Un viaje de red por registro, en secuencia. Un fallo se registra y se
    /// continúa con el siguiente.
    pub async fn push(&self) -> InvoicingResult<PushReport> {
        let mut report = PushReport::default();
        let stamp = Utc::now();

        for mut doc in self.store.documents().await? {
            doc.updated_at = Some(stamp);
            let record = serde_json::to_value(&doc)?;
            self.push_one(Collection::Documents, &doc.id, &record, &mut report).await;
        }

        for mut item in self.store.catalog().await? {
            item.updated_at = Some(stamp);
            let record = serde_json::to_value(&item)?;
            self.push_one(Collection::Items, &item.id, &record, &mut report).await;
        }

        tracing::info!(
            pushed = report.pushed,
            failed = report.failed,
            "Sincronización local -> remoto completada"
        );
        Ok(report)
    }

    async fn push_one(
        &self,
        collection: Collection,
        id: &str,
        record: &serde_json::Value,
        report: &mut PushReport,
    ) {
        match self.remote.upsert(collection, id, record).await {
            Ok(()) => {
                report.pushed += 1;
                metrics::SYNC_RECORDS.with_label_values(&["push", "ok"]).inc();
            }
            Err(e) => {
                report.failed += 1;
                metrics::SYNC_RECORDS.with_label_values(&["push", "failed"]).inc();
                tracing::warn!(collection = collection.as_str(), id, "Error de sincronización: {}", e);
            }
        }
    }
}
