//! Numeración secuencial por tipo de documento.
//!
//! `set_counter` y `set_prefix` sobrescriben sin validar contra los números
//! ya emitidos, así que una edición manual puede producir duplicados.

use crate::core::InvoicingResult;
use crate::metrics;
use crate::models::DocumentType;
use crate::storage::LocalStore;

pub struct Numbering<'a> {
    store: &'a LocalStore,
}

impl<'a> Numbering<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Devuelve el contador actual e incrementa el valor guardado.
    pub async fn next(&self, doc_type: DocumentType) -> InvoicingResult<u64> {
        // Una sola sentencia: dos peticiones concurrentes no reciben el mismo número.
        let issued = sqlx::query_scalar::<_, i64>(
            "INSERT INTO numbering (doc_type, prefix, next_value) VALUES (?1, ?2, 2)
             ON CONFLICT(doc_type) DO UPDATE SET next_value = MAX(next_value, 1) + 1
             RETURNING next_value - 1",
        )
        .bind(doc_type.code())
        .bind(doc_type.default_prefix())
        .fetch_one(self.store.pool())
        .await?;

        metrics::NUMBERS_ISSUED
            .with_label_values(&[doc_type.code()])
            .inc();
        tracing::debug!(doc_type = doc_type.code(), number = issued, "Número asignado");

        Ok(issued as u64)
    }

    pub async fn prefix(&self, doc_type: DocumentType) -> InvoicingResult<String> {
        let prefix = sqlx::query_scalar::<_, String>("SELECT prefix FROM numbering WHERE doc_type = ?1")
            .bind(doc_type.code())
            .fetch_optional(self.store.pool())
            .await?;

        Ok(prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| doc_type.default_prefix()))
    }

    /// Valor que devolverá el próximo `next`.
    pub async fn counter(&self, doc_type: DocumentType) -> InvoicingResult<u64> {
        let value = sqlx::query_scalar::<_, i64>("SELECT next_value FROM numbering WHERE doc_type = ?1")
            .bind(doc_type.code())
            .fetch_optional(self.store.pool())
            .await?;

        Ok(value.unwrap_or(1).max(1) as u64)
    }

    /// Valores menores que 1 (o no numéricos) se guardan como 1.
    pub async fn set_counter(&self, doc_type: DocumentType, value: f64) -> InvoicingResult<()> {
        let value = if value.is_finite() && value >= 1.0 {
            value.trunc() as i64
        } else {
            1
        };

        sqlx::query(
            "INSERT INTO numbering (doc_type, prefix, next_value) VALUES (?1, ?2, ?3)
             ON CONFLICT(doc_type) DO UPDATE SET next_value = excluded.next_value",
        )
        .bind(doc_type.code())
        .bind(doc_type.default_prefix())
        .bind(value)
        .execute(self.store.pool())
        .await?;

        tracing::info!(doc_type = doc_type.code(), counter = value, "Contador actualizado");
        Ok(())
    }

    pub async fn set_prefix(&self, doc_type: DocumentType, prefix: &str) -> InvoicingResult<()> {
        sqlx::query(
            "INSERT INTO numbering (doc_type, prefix, next_value) VALUES (?1, ?2, 1)
             ON CONFLICT(doc_type) DO UPDATE SET prefix = excluded.prefix",
        )
        .bind(doc_type.code())
        .bind(prefix)
        .execute(self.store.pool())
        .await?;

        tracing::info!(doc_type = doc_type.code(), prefix, "Prefijo actualizado");
        Ok(())
    }
}
