use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use oasis_invoicing::api::{configure_routes, ApiState};
use oasis_invoicing::AppConfig;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting Oasis invoicing API");

    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    let config = AppConfig::load()?;
    let host = config.host.clone();
    let port = config.port;

    let state = web::Data::new(ApiState::new(config).await?);

    tracing::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
