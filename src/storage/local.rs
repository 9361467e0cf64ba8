use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::core::InvoicingResult;
use crate::models::{CatalogItem, Document, DocumentType, Settings, SettingsPatch};
use crate::numbering::Numbering;

/// Almacén local en SQLite: configuración, numeración, documentos,
/// catálogo y sesiones.
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub async fn connect(database_url: &str) -> InvoicingResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Base de datos en memoria con una sola conexión que nunca se recicla.
    pub async fn in_memory() -> InvoicingResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> InvoicingResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = LocalStore { pool };
        store.ensure().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> InvoicingResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Crea los valores por defecto que falten. El catálogo de ejemplo solo
    /// se siembra en el primer arranque.
    pub async fn ensure(&self) -> InvoicingResult<()> {
        let first_run = sqlx::query_scalar::<_, String>("SELECT body FROM settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?
            .is_none();

        if first_run {
            self.write_settings(&Settings::default()).await?;
        }

        for doc_type in DocumentType::ALL {
            sqlx::query(
                "INSERT OR IGNORE INTO numbering (doc_type, prefix, next_value) VALUES (?1, ?2, 1)",
            )
            .bind(doc_type.code())
            .bind(doc_type.default_prefix())
            .execute(&self.pool)
            .await?;
        }

        if first_run {
            for item in CatalogItem::seed() {
                self.save_catalog_item(&item).await?;
            }
            tracing::info!("Almacén local inicializado con valores por defecto");
        }

        Ok(())
    }

    /// Borra todos los datos y vuelve a sembrar los valores por defecto.
    pub async fn reset(&self) -> InvoicingResult<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["settings", "numbering", "documents", "catalog_items", "sessions"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::warn!("Almacén local reiniciado");
        self.ensure().await
    }

    // Configuración

    pub async fn settings(&self) -> InvoicingResult<Settings> {
        let body = sqlx::query_scalar::<_, String>("SELECT body FROM settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        let mut settings = match body {
            Some(body) => serde_json::from_str::<Settings>(&body)?,
            None => Settings::default(),
        };
        settings.prefixes.clear();
        settings.counters.clear();

        let rows = sqlx::query("SELECT doc_type, prefix, next_value FROM numbering")
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            let code: String = row.try_get("doc_type")?;
            let Ok(doc_type) = code.parse::<DocumentType>() else {
                continue;
            };
            let next_value: i64 = row.try_get("next_value")?;
            settings.prefixes.insert(doc_type, row.try_get("prefix")?);
            settings.counters.insert(doc_type, next_value.max(1) as u64);
        }

        for doc_type in DocumentType::ALL {
            settings
                .prefixes
                .entry(doc_type)
                .or_insert_with(|| doc_type.default_prefix());
            settings.counters.entry(doc_type).or_insert(1);
        }

        Ok(settings)
    }

    pub async fn update_settings(&self, patch: &SettingsPatch) -> InvoicingResult<Settings> {
        let mut settings = self.settings().await?;
        settings.apply(patch);
        self.write_settings(&settings).await?;

        let numbering = Numbering::new(self);
        for (doc_type, prefix) in &patch.prefixes {
            numbering.set_prefix(*doc_type, prefix).await?;
        }
        for (doc_type, counter) in &patch.counters {
            numbering.set_counter(*doc_type, crate::core::to_number(counter)).await?;
        }

        self.settings().await
    }

    pub async fn set_pin_hash(&self, hash: &str) -> InvoicingResult<()> {
        let mut settings = self.settings().await?;
        settings.pin_hash = Some(hash.to_string());
        self.write_settings(&settings).await
    }

    async fn write_settings(&self, settings: &Settings) -> InvoicingResult<()> {
        let mut stored = settings.clone();
        stored.prefixes.clear();
        stored.counters.clear();

        sqlx::query(
            "INSERT INTO settings (id, body) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body",
        )
        .bind(serde_json::to_string(&stored)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Documentos

    /// Inserta o reemplaza por id. Los documentos nuevos quedan primeros en
    /// el listado.
    pub async fn save_document(&self, doc: &Document) -> InvoicingResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, doc_type, number, date, status, body, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                doc_type = excluded.doc_type,
                number = excluded.number,
                date = excluded.date,
                status = excluded.status,
                body = excluded.body,
                updated_at = excluded.updated_at",
        )
        .bind(&doc.id)
        .bind(doc.doc_type.code())
        .bind(doc.number as i64)
        .bind(doc.date.format("%Y-%m-%d").to_string())
        .bind(doc.status.as_str())
        .bind(serde_json::to_string(doc)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn document(&self, id: &str) -> InvoicingResult<Option<Document>> {
        let body = sqlx::query_scalar::<_, String>("SELECT body FROM documents WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match body {
            Some(body) => Some(serde_json::from_str(&body)?),
            None => None,
        })
    }

    pub async fn documents(&self) -> InvoicingResult<Vec<Document>> {
        let bodies = sqlx::query_scalar::<_, String>("SELECT body FROM documents ORDER BY rowid DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(decode_all(bodies, "documento"))
    }

    /// Documentos con fecha dentro del rango inclusivo, más recientes primero.
    pub async fn documents_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> InvoicingResult<Vec<Document>> {
        let bodies = sqlx::query_scalar::<_, String>(
            "SELECT body FROM documents
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date DESC, rowid DESC",
        )
        .bind(from.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(to.map(|d| d.format("%Y-%m-%d").to_string()))
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_all(bodies, "documento"))
    }

    pub async fn delete_document(&self, id: &str) -> InvoicingResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Catálogo

    pub async fn save_catalog_item(&self, item: &CatalogItem) -> InvoicingResult<()> {
        sqlx::query(
            "INSERT INTO catalog_items (id, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(&item.id)
        .bind(serde_json::to_string(item)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn catalog_item(&self, id: &str) -> InvoicingResult<Option<CatalogItem>> {
        let body = sqlx::query_scalar::<_, String>("SELECT body FROM catalog_items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match body {
            Some(body) => Some(serde_json::from_str(&body)?),
            None => None,
        })
    }

    pub async fn catalog(&self) -> InvoicingResult<Vec<CatalogItem>> {
        let bodies = sqlx::query_scalar::<_, String>("SELECT body FROM catalog_items ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(decode_all(bodies, "artículo"))
    }

    pub async fn delete_catalog_item(&self, id: &str) -> InvoicingResult<bool> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Sesiones

    pub async fn insert_session(&self, token: &str, expires_at: DateTime<Utc>) -> InvoicingResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, expires_at) VALUES (?1, ?2)
             ON CONFLICT(token) DO UPDATE SET expires_at = excluded.expires_at",
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn session_expiry(&self, token: &str) -> InvoicingResult<Option<DateTime<Utc>>> {
        let expiry = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT expires_at FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expiry)
    }

    pub async fn delete_session(&self, token: &str) -> InvoicingResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> InvoicingResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(bodies: Vec<String>, kind: &str) -> Vec<T> {
    bodies
        .into_iter()
        .filter_map(|body| match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Registro de {} ilegible en el almacén local: {}", kind, e);
                None
            }
        })
        .collect()
}
