use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::remote::{Collection, RemoteStore};
use crate::core::{FirebaseConfig, InvoicingError, InvoicingResult};

const PAGE_SIZE: &str = "300";

/// Cliente REST de Firestore. Cada usuario tiene sus colecciones bajo
/// `users/{uid}/`.
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
    user_id: String,
    api_key: Option<String>,
    id_token: Option<String>,
    documents_collection: String,
    items_collection: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreClient {
    pub fn new(config: &FirebaseConfig, timeout: Duration) -> InvoicingResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| InvoicingError::Remote(format!("URL base inválida: {}", e)))?;

        Ok(FirestoreClient {
            http,
            base_url,
            project_id: config.project_id.clone(),
            user_id: config.user_id.clone(),
            api_key: config.api_key.clone(),
            id_token: config.id_token.clone(),
            documents_collection: config.documents_collection.clone(),
            items_collection: config.items_collection.clone(),
        })
    }

    /// Cada parte se codifica como un solo segmento de ruta.
    fn collection_url(&self, collection: Collection) -> InvoicingResult<Url> {
        let name = match collection {
            Collection::Documents => &self.documents_collection,
            Collection::Items => &self.items_collection,
        };

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| InvoicingError::Remote(format!("URL base sin ruta: {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                "users",
                self.user_id.as_str(),
                name.as_str(),
            ]);
        Ok(url)
    }

    fn document_url(&self, collection: Collection, id: &str) -> InvoicingResult<Url> {
        check_document_id(id)?;

        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|_| InvoicingError::Remote(format!("URL base sin ruta: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        request
    }

    async fn check(response: reqwest::Response) -> InvoicingResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(InvoicingError::Remote(format!("Firestore respondió {}: {}", status, body)))
    }
}

#[async_trait]
impl RemoteStore for FirestoreClient {
    async fn list(&self, collection: Collection) -> InvoicingResult<Vec<Value>> {
        let url = self.collection_url(collection)?;
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.authorize(self.http.get(url.clone())).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListResponse = Self::check(request.send().await?).await?.json().await?;

            for doc in page.documents {
                let mut record = decode_fields(&doc.fields);
                if let Value::Object(map) = &mut record {
                    if !map.contains_key("id") {
                        let id = doc.name.rsplit('/').next().unwrap_or_default();
                        map.insert("id".to_string(), Value::String(id.to_string()));
                    }
                }
                records.push(record);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(collection = collection.as_str(), count = records.len(), "Colección remota leída");
        Ok(records)
    }

    async fn upsert(&self, collection: Collection, id: &str, record: &Value) -> InvoicingResult<()> {
        let Value::Object(map) = record else {
            return Err(InvoicingError::Remote("el registro debe ser un objeto".to_string()));
        };

        let mask: Vec<(&str, String)> = map
            .keys()
            .map(|key| ("updateMask.fieldPaths", field_path(key)))
            .collect();

        let url = self.document_url(collection, id)?;
        let request = self
            .authorize(self.http.patch(url))
            .query(&mask)
            .json(&json!({ "fields": encode_fields(map) }));

        Self::check(request.send().await?).await?;
        Ok(())
    }
}

/// Un id de Firestore es un único segmento: no vacío, sin `/` y distinto
/// de `.` y `..`.
fn check_document_id(id: &str) -> InvoicingResult<()> {
    if id.is_empty() || id == "." || id == ".." || id.contains('/') {
        return Err(InvoicingError::Remote(format!("id de registro no válido: {:?}", id)));
    }
    Ok(())
}

/// Las rutas de campo que no son identificadores simples van entre comillas
/// invertidas.
fn field_path(key: &str) -> String {
    let simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        key.to_string()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// JSON -> valor tipado de Firestore.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or(0.0) })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), decode_value(value)))
            .collect(),
    )
}

/// Valor tipado de Firestore -> JSON.
pub fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("stringValue") {
        return s.clone();
    }
    if let Some(i) = typed.get("integerValue") {
        return match i {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        };
    }
    if let Some(d) = typed.get("doubleValue") {
        return match d {
            Value::Number(_) => d.clone(),
            _ => Value::Null,
        };
    }
    if let Some(b) = typed.get("booleanValue") {
        return b.clone();
    }
    if let Some(ts) = typed.get("timestampValue") {
        return ts.clone();
    }
    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = typed.get("mapValue") {
        return match map.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields),
            None => Value::Object(Map::new()),
        };
    }
    for passthrough in ["referenceValue", "bytesValue", "geoPointValue"] {
        if let Some(v) = typed.get(passthrough) {
            return v.clone();
        }
    }

    Value::Null
}
