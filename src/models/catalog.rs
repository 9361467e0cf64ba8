use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub desc: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    /// Referencia a la foto (data URL o URL).
    #[serde(default, alias = "img", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, desc: impl Into<String>, price: f64) -> Self {
        CatalogItem {
            id: new_id(),
            name: name.into(),
            desc: desc.into(),
            price,
            photo: None,
            updated_at: None,
        }
    }

    /// Artículos con los que arranca un catálogo vacío.
    pub fn seed() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Servicio básico", "Mano de obra", 50.0),
            CatalogItem::new("Producto estándar", "Artículo", 25.0),
        ]
    }
}
