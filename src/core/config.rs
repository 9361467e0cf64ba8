use config::{Config, Environment, File};
use serde::Deserialize;

use super::error::InvoicingResult;

/// Configuración de la aplicación.
///
/// Se carga desde `oasis.toml` (opcional) y variables de entorno con prefijo
/// `OASIS_`. Las secciones anidadas usan `__`, por ejemplo
/// `OASIS_FIREBASE__PROJECT_ID`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_login_attempts")]
    pub login_attempts_per_minute: u32,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub user_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default = "default_documents_collection")]
    pub documents_collection: String,
    #[serde(default = "default_items_collection")]
    pub items_collection: String,
    #[serde(default = "default_firestore_url")]
    pub base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://oasis.db".to_string()
}

fn default_session_ttl_hours() -> i64 {
    8
}

fn default_login_attempts() -> u32 {
    10
}

fn default_sync_interval() -> u64 {
    300
}

fn default_remote_timeout() -> u64 {
    30
}

fn default_documents_collection() -> String {
    "documentos".to_string()
}

fn default_items_collection() -> String {
    "items".to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            session_ttl_hours: default_session_ttl_hours(),
            login_attempts_per_minute: default_login_attempts(),
            sync_interval_secs: default_sync_interval(),
            remote_timeout_secs: default_remote_timeout(),
            firebase: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> InvoicingResult<Self> {
        dotenv::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("oasis").required(false))
            .add_source(
                Environment::with_prefix("OASIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
