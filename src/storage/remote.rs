use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

use crate::core::{InvoicingError, InvoicingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Documents,
    Items,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Documents => "documents",
            Collection::Items => "items",
        }
    }
}

/// Colección remota por usuario, indexada por id.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Todos los registros de la colección para la identidad actual.
    async fn list(&self, collection: Collection) -> InvoicingResult<Vec<Value>>;

    /// Escribe con semántica de merge: solo se reemplazan los campos presentes.
    async fn upsert(&self, collection: Collection, id: &str, record: &Value) -> InvoicingResult<()>;
}

/// Almacén remoto en memoria, útil sin conexión y en pruebas.
#[derive(Default)]
pub struct MemoryRemote {
    records: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Las escrituras de este id fallarán.
    pub async fn fail_writes_for(&self, id: &str) {
        self.failing.write().await.insert(id.to_string());
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        self.records
            .read()
            .await
            .get(&collection)
            .and_then(|records| records.get(id))
            .cloned()
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.records
            .read()
            .await
            .get(&collection)
            .map_or(0, |records| records.len())
    }

    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list(&self, collection: Collection) -> InvoicingResult<Vec<Value>> {
        Ok(self
            .records
            .read()
            .await
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(&self, collection: Collection, id: &str, record: &Value) -> InvoicingResult<()> {
        if self.failing.read().await.contains(id) {
            return Err(InvoicingError::Remote(format!("escritura rechazada para {}", id)));
        }

        let Value::Object(fields) = record else {
            return Err(InvoicingError::Remote("el registro debe ser un objeto".to_string()));
        };

        let mut records = self.records.write().await;
        let entry = records
            .entry(collection)
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if let Value::Object(existing) = entry {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
        }

        Ok(())
    }
}
