//! Autenticación local por PIN y sesiones con expiración deslizante.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::{InvoicingError, InvoicingResult};
use crate::storage::LocalStore;

pub const MIN_PIN_LENGTH: usize = 4;

/// SHA-256 del PIN en hexadecimal minúscula.
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

/// Reglas para crear un PIN nuevo.
pub fn validate_new_pin(pin: &str, confirm: &str) -> InvoicingResult<String> {
    let pin = pin.trim();
    if pin.chars().count() < MIN_PIN_LENGTH {
        return Err(InvoicingError::Validation(format!(
            "El PIN debe tener al menos {} dígitos.",
            MIN_PIN_LENGTH
        )));
    }
    if pin != confirm.trim() {
        return Err(InvoicingError::Validation("Los PIN no coinciden.".to_string()));
    }
    Ok(pin.to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct Auth<'a> {
    store: &'a LocalStore,
    ttl: Duration,
}

impl<'a> Auth<'a> {
    pub fn new(store: &'a LocalStore, ttl_hours: i64) -> Self {
        Self {
            store,
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub async fn has_pin(&self) -> InvoicingResult<bool> {
        Ok(self.store.settings().await?.has_pin())
    }

    /// Primer uso: guarda el PIN y abre sesión.
    pub async fn setup(&self, pin: &str, confirm: &str) -> InvoicingResult<Session> {
        if self.has_pin().await? {
            return Err(InvoicingError::Validation("Ya existe un PIN configurado.".to_string()));
        }

        let pin = validate_new_pin(pin, confirm)?;
        self.store.set_pin_hash(&hash_pin(&pin)).await?;
        tracing::info!("PIN configurado");

        self.start().await
    }

    pub async fn login(&self, pin: &str) -> InvoicingResult<Session> {
        let settings = self.store.settings().await?;
        let Some(stored) = settings.pin_hash.filter(|h| !h.is_empty()) else {
            return Err(InvoicingError::Validation("Primero cree un PIN.".to_string()));
        };

        if hash_pin(pin.trim()) != stored {
            tracing::warn!("Intento de acceso con PIN incorrecto");
            return Err(InvoicingError::Unauthorized("PIN incorrecto.".to_string()));
        }

        self.start().await
    }

    async fn start(&self) -> InvoicingResult<Session> {
        let now = Utc::now();
        self.store.purge_expired_sessions(now).await?;

        let session = Session {
            token: Uuid::new_v4().to_string(),
            expires_at: now + self.ttl,
        };
        self.store.insert_session(&session.token, session.expires_at).await?;

        Ok(session)
    }

    /// Valida el token y extiende su expiración. Devuelve `false` si no
    /// existe o ya venció.
    pub async fn touch(&self, token: &str) -> InvoicingResult<bool> {
        let now = Utc::now();
        match self.store.session_expiry(token).await? {
            Some(expires_at) if expires_at > now => {
                self.store.insert_session(token, now + self.ttl).await?;
                Ok(true)
            }
            Some(_) => {
                self.store.delete_session(token).await?;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    pub async fn logout(&self, token: &str) -> InvoicingResult<()> {
        self.store.delete_session(token).await
    }
}
