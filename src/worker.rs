use anyhow::{bail, Result};
use std::time::Duration;

use oasis_invoicing::{AppConfig, FirestoreClient, LocalStore, SyncEngine};

/// Sincronización periódica con Firestore, independiente de la API.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting sync worker");

    let config = AppConfig::load()?;
    let Some(firebase) = config.firebase.as_ref() else {
        bail!("sync worker requires OASIS_FIREBASE__PROJECT_ID and OASIS_FIREBASE__USER_ID");
    };

    let store = LocalStore::connect(&config.database_url).await?;
    let remote = FirestoreClient::new(firebase, Duration::from_secs(config.remote_timeout_secs))?;
    let engine = SyncEngine::new(&store, &remote);

    let mut ticker = tokio::time::interval(Duration::from_secs(config.sync_interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match engine.run().await {
                    Ok(report) => tracing::info!(?report, "Sync cycle completed"),
                    // Un ciclo fallido se reintenta en el siguiente tick
                    Err(e) => tracing::error!("Sync cycle failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, stopping sync worker");
                break;
            }
        }
    }

    store.pool().close().await;
    Ok(())
}
