use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoicingError {
    #[error("Error de base de datos: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error de migración: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Error de configuración: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("No autorizado: {0}")]
    Unauthorized(String),

    #[error("Demasiados intentos, espere un momento")]
    RateLimited,

    #[error("La sincronización no está configurada")]
    SyncNotConfigured,

    #[error("Error remoto: {0}")]
    Remote(String),

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error de plantilla: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Error de reporte: {0}")]
    Report(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for InvoicingError {
    fn from(error: reqwest::Error) -> Self {
        InvoicingError::Remote(error.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for InvoicingError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        InvoicingError::Report(error.to_string())
    }
}

pub type InvoicingResult<T> = Result<T, InvoicingError>;
