use crate::core::{InvoicingError, InvoicingResult};
use crate::metrics;
use crate::models::{Document, DocumentStatus, DocumentTotals, DocumentType};
use crate::numbering::Numbering;
use crate::storage::LocalStore;

/// Operaciones sobre facturas y cotizaciones.
pub struct Documents<'a> {
    store: &'a LocalStore,
}

impl<'a> Documents<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Crea y guarda un documento vacío con el siguiente número del tipo.
    pub async fn create(&self, doc_type: DocumentType) -> InvoicingResult<Document> {
        let numbering = Numbering::new(self.store);
        let settings = self.store.settings().await?;

        let prefix = numbering.prefix(doc_type).await?;
        let number = numbering.next(doc_type).await?;
        let doc = Document::blank(doc_type, prefix, number, settings.tax_percent);

        self.store.save_document(&doc).await?;
        metrics::DOCUMENTS_SAVED.inc();
        tracing::info!(id = %doc.id, number = %doc.display_number(), "Documento creado");

        Ok(doc)
    }

    /// Guarda por id. Un documento existente conserva tipo, prefijo y número;
    /// solo `reissue` los cambia.
    pub async fn save(&self, mut doc: Document) -> InvoicingResult<Document> {
        validate(&doc)?;

        match self.store.document(&doc.id).await? {
            Some(existing) => {
                if existing.doc_type != doc.doc_type {
                    return Err(InvoicingError::Validation(
                        "El tipo de un documento existente solo cambia al reemitirlo".to_string(),
                    ));
                }
                doc.prefix = existing.prefix;
                doc.number = existing.number;
            }
            None => {
                let numbering = Numbering::new(self.store);
                if doc.prefix.is_empty() {
                    doc.prefix = numbering.prefix(doc.doc_type).await?;
                }
                if doc.number == 0 {
                    doc.number = numbering.next(doc.doc_type).await?;
                }
            }
        }

        self.store.save_document(&doc).await?;
        metrics::DOCUMENTS_SAVED.inc();
        tracing::debug!(id = %doc.id, "Documento guardado");

        Ok(doc)
    }

    pub async fn get(&self, id: &str) -> InvoicingResult<Document> {
        self.store
            .document(id)
            .await?
            .ok_or_else(|| InvoicingError::NotFound(format!("documento {}", id)))
    }

    pub async fn list(&self) -> InvoicingResult<Vec<Document>> {
        self.store.documents().await
    }

    pub async fn delete(&self, id: &str) -> InvoicingResult<()> {
        if !self.store.delete_document(id).await? {
            return Err(InvoicingError::NotFound(format!("documento {}", id)));
        }
        tracing::info!(id, "Documento eliminado");
        Ok(())
    }

    pub async fn totals(&self, id: &str) -> InvoicingResult<DocumentTotals> {
        Ok(self.get(id).await?.totals())
    }

    pub async fn finalize(&self, id: &str) -> InvoicingResult<Document> {
        self.set_status(id, DocumentStatus::Final).await
    }

    /// Los documentos anulados quedan fuera de los reportes.
    pub async fn void(&self, id: &str) -> InvoicingResult<Document> {
        self.set_status(id, DocumentStatus::Voided).await
    }

    async fn set_status(&self, id: &str, status: DocumentStatus) -> InvoicingResult<Document> {
        let mut doc = self.get(id).await?;
        doc.status = status;
        self.store.save_document(&doc).await?;
        tracing::info!(id, status = %status, "Estado del documento actualizado");
        Ok(doc)
    }

    /// Asigna un número nuevo del contador, opcionalmente convirtiendo el
    /// documento a otro tipo (por ejemplo, cotización a factura).
    pub async fn reissue(&self, id: &str, doc_type: Option<DocumentType>) -> InvoicingResult<Document> {
        let mut doc = self.get(id).await?;
        let numbering = Numbering::new(self.store);

        let previous = doc.display_number();
        doc.doc_type = doc_type.unwrap_or(doc.doc_type);
        doc.prefix = numbering.prefix(doc.doc_type).await?;
        doc.number = numbering.next(doc.doc_type).await?;

        self.store.save_document(&doc).await?;
        tracing::info!(id, previous = %previous, number = %doc.display_number(), "Documento reemitido");

        Ok(doc)
    }
}

fn validate(doc: &Document) -> InvoicingResult<()> {
    if doc.id.trim().is_empty() {
        return Err(InvoicingError::Validation("El documento necesita un id".to_string()));
    }
    if !(0.0..=100.0).contains(&doc.discount_pct) {
        return Err(InvoicingError::Validation(
            "El descuento debe estar entre 0 y 100".to_string(),
        ));
    }
    if doc.tax_pct < 0.0 {
        return Err(InvoicingError::Validation(
            "El impuesto no puede ser negativo".to_string(),
        ));
    }
    for line in &doc.lines {
        if line.price < 0.0 {
            return Err(InvoicingError::Validation(format!(
                "Precio negativo en la línea '{}'",
                line.name
            )));
        }
        if line.qty <= 0.0 {
            return Err(InvoicingError::Validation(format!(
                "Cantidad inválida en la línea '{}'",
                line.name
            )));
        }
    }
    Ok(())
}
