use crate::core::{InvoicingError, InvoicingResult};
use crate::models::CatalogItem;
use crate::storage::LocalStore;
use uuid::Uuid;

pub struct Catalog<'a> {
    store: &'a LocalStore,
}

impl<'a> Catalog<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> InvoicingResult<Vec<CatalogItem>> {
        self.store.catalog().await
    }

    /// Agrega un artículo nuevo. Un id ya existente se rechaza; para
    /// modificarlo está `update`.
    pub async fn add(&self, mut item: CatalogItem) -> InvoicingResult<CatalogItem> {
        item.name = item.name.trim().to_string();
        validate(&item)?;

        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        } else if self.store.catalog_item(&item.id).await?.is_some() {
            return Err(InvoicingError::Validation(format!(
                "Ya existe un artículo con id {}",
                item.id
            )));
        }

        self.store.save_catalog_item(&item).await?;
        tracing::info!(id = %item.id, name = %item.name, "Artículo agregado al catálogo");
        Ok(item)
    }

    pub async fn update(&self, id: &str, mut item: CatalogItem) -> InvoicingResult<CatalogItem> {
        if self.store.catalog_item(id).await?.is_none() {
            return Err(InvoicingError::NotFound(format!("artículo {}", id)));
        }

        item.id = id.to_string();
        item.name = item.name.trim().to_string();
        validate(&item)?;

        self.store.save_catalog_item(&item).await?;
        Ok(item)
    }

    /// Borrado definitivo. No se propaga al almacén remoto.
    pub async fn delete(&self, id: &str) -> InvoicingResult<()> {
        if !self.store.delete_catalog_item(id).await? {
            return Err(InvoicingError::NotFound(format!("artículo {}", id)));
        }
        tracing::info!(id, "Artículo eliminado del catálogo");
        Ok(())
    }
}

fn validate(item: &CatalogItem) -> InvoicingResult<()> {
    if item.name.is_empty() {
        return Err(InvoicingError::Validation("Nombre requerido".to_string()));
    }
    if item.price < 0.0 {
        return Err(InvoicingError::Validation(
            "El precio no puede ser negativo".to_string(),
        ));
    }
    Ok(())
}
