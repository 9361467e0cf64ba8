use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::Auth;
use crate::core::{AppConfig, InvoicingError, InvoicingResult};
use crate::storage::{FirestoreClient, LocalStore, RemoteStore};
use crate::templates::PrintRenderer;

#[derive(Clone)]
pub struct ApiState {
    pub store: LocalStore,
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub renderer: Arc<PrintRenderer>,
    pub login_limiter: Arc<DefaultDirectRateLimiter>,
    pub config: Arc<AppConfig>,
}

impl ApiState {
    pub async fn new(config: AppConfig) -> InvoicingResult<Self> {
        let store = LocalStore::connect(&config.database_url).await?;

        let remote: Option<Arc<dyn RemoteStore>> = match &config.firebase {
            Some(firebase) => {
                let client = FirestoreClient::new(
                    firebase,
                    Duration::from_secs(config.remote_timeout_secs),
                )?;
                tracing::info!(project = %firebase.project_id, "Sincronización remota habilitada");
                Some(Arc::new(client))
            }
            None => {
                tracing::info!("Sin almacén remoto configurado; modo local");
                None
            }
        };

        Self::with_parts(config, store, remote)
    }

    pub fn with_parts(
        config: AppConfig,
        store: LocalStore,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> InvoicingResult<Self> {
        let attempts = NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let login_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(attempts)));

        Ok(ApiState {
            store,
            remote,
            renderer: Arc::new(PrintRenderer::new()?),
            login_limiter,
            config: Arc::new(config),
        })
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.store, self.config.session_ttl_hours)
    }

    pub fn remote(&self) -> InvoicingResult<&dyn RemoteStore> {
        self.remote.as_deref().ok_or(InvoicingError::SyncNotConfigured)
    }
}
