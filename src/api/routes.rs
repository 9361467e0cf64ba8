use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;

use super::error::{ApiError, ApiResult};
use super::handlers;
use super::middleware::auth::validator;
use super::state::ApiState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(metrics_endpoint))

        // Sesión: abierto salvo logout
        .service(
            web::scope("/api/v1/auth")
                .wrap(cors())
                .route("/status", web::get().to(handlers::auth_status))
                .route("/setup", web::post().to(handlers::setup_pin))
                .route("/login", web::post().to(handlers::login))
                .service(
                    web::resource("/logout")
                        .wrap(HttpAuthentication::bearer(validator))
                        .route(web::post().to(handlers::logout)),
                ),
        )

        // API v1
        .service(
            web::scope("/api/v1")
                .wrap(HttpAuthentication::bearer(validator))
                .wrap(Compress::default())
                .wrap(cors())
                .service(
                    web::scope("/settings")
                        .route("", web::get().to(handlers::get_settings))
                        .route("", web::put().to(handlers::update_settings))
                        .route("/reset", web::post().to(handlers::reset_data)),
                )
                .service(
                    web::resource("/numbering/{type}")
                        .route(web::get().to(handlers::get_numbering))
                        .route(web::put().to(handlers::update_numbering)),
                )
                .service(
                    web::scope("/catalog")
                        .route("", web::get().to(handlers::list_catalog))
                        .route("", web::post().to(handlers::add_catalog_item))
                        .route("/{id}", web::put().to(handlers::update_catalog_item))
                        .route("/{id}", web::delete().to(handlers::delete_catalog_item)),
                )
                .service(
                    web::scope("/documents")
                        .route("", web::get().to(handlers::list_documents))
                        .route("/new", web::post().to(handlers::new_document))
                        .route("/{id}", web::get().to(handlers::get_document))
                        .route("/{id}", web::put().to(handlers::save_document))
                        .route("/{id}", web::delete().to(handlers::delete_document))
                        .route("/{id}/totals", web::get().to(handlers::document_totals))
                        .route("/{id}/finalize", web::post().to(handlers::finalize_document))
                        .route("/{id}/void", web::post().to(handlers::void_document))
                        .route("/{id}/reissue", web::post().to(handlers::reissue_document))
                        .route("/{id}/print", web::get().to(handlers::print_document)),
                )
                .route("/reports", web::get().to(handlers::report))
                .service(
                    web::scope("/sync")
                        .route("", web::post().to(handlers::sync_all))
                        .route("/pull", web::post().to(handlers::sync_pull))
                        .route("/push", web::post().to(handlers::sync_push)),
                ),
        )
        .default_service(web::to(not_found));
}

fn cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            origin.as_bytes().starts_with(b"http://localhost")
                || origin.as_bytes().starts_with(b"http://127.0.0.1")
                || origin.as_bytes().starts_with(b"https://")
        })
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec!["Content-Type", "Authorization"])
        .max_age(3600)
}

async fn not_found() -> ApiResult<HttpResponse> {
    Err(ApiError::not_found("Ruta no encontrada"))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn readiness_check(state: web::Data<ApiState>) -> HttpResponse {
    let db_healthy = state.store.ping().await.is_ok();
    let remote = if state.remote.is_some() { "configured" } else { "disabled" };

    if db_healthy {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "checks": {
                "database": "ok",
                "remote": remote
            }
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "checks": {
                "database": "failed",
                "remote": remote
            }
        }))
    }
}

async fn metrics_endpoint() -> ApiResult<HttpResponse> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}
