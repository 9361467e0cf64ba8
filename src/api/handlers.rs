use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use super::error::ApiResult;
use super::middleware::auth::SessionInfo;
use super::state::ApiState;
use crate::catalog::Catalog;
use crate::core::InvoicingError;
use crate::documents::Documents;
use crate::models::{CatalogItem, Document, DocumentType, ReportFilter, ReportFormat, SettingsPatch};
use crate::numbering::Numbering;
use crate::reports;
use crate::sync::SyncEngine;

// Auth

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub pin: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

pub async fn auth_status(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let has_pin = state.auth().has_pin().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "hasPin": has_pin })))
}

pub async fn setup_pin(
    body: web::Json<SetupRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let session = state.auth().setup(&body.pin, &body.confirm).await?;
    tracing::info!("PIN configurado");
    Ok(HttpResponse::Created().json(session))
}

pub async fn login(
    body: web::Json<LoginRequest>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    if state.login_limiter.check().is_err() {
        tracing::warn!("Límite de intentos de acceso excedido");
        return Err(InvoicingError::RateLimited.into());
    }

    let session = state.auth().login(&body.pin).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn logout(req: HttpRequest, state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let session = req.extensions().get::<SessionInfo>().cloned();
    if let Some(session) = session {
        state.auth().logout(&session.token).await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

// Settings

pub async fn get_settings(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let settings = state.store.settings().await?;
    Ok(HttpResponse::Ok().json(settings.redacted()))
}

pub async fn update_settings(
    patch: web::Json<SettingsPatch>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let settings = state.store.update_settings(&patch).await?;
    Ok(HttpResponse::Ok().json(settings.redacted()))
}

pub async fn reset_data(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    tracing::warn!("Reiniciando todos los datos locales");
    state.store.reset().await?;
    Ok(HttpResponse::NoContent().finish())
}

// Numbering

#[derive(Debug, Deserialize)]
pub struct NumberingUpdate {
    pub prefix: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::optional_number")]
    pub counter: Option<f64>,
}

pub async fn get_numbering(
    path: web::Path<DocumentType>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc_type = path.into_inner();
    let numbering = Numbering::new(&state.store);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "type": doc_type,
        "prefix": numbering.prefix(doc_type).await?,
        "counter": numbering.counter(doc_type).await?,
    })))
}

pub async fn update_numbering(
    path: web::Path<DocumentType>,
    body: web::Json<NumberingUpdate>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc_type = path.into_inner();
    let numbering = Numbering::new(&state.store);

    if let Some(prefix) = &body.prefix {
        numbering.set_prefix(doc_type, prefix).await?;
    }
    if let Some(counter) = body.counter {
        numbering.set_counter(doc_type, counter).await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "type": doc_type,
        "prefix": numbering.prefix(doc_type).await?,
        "counter": numbering.counter(doc_type).await?,
    })))
}

// Catalog

pub async fn list_catalog(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let items = Catalog::new(&state.store).list().await?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn add_catalog_item(
    item: web::Json<CatalogItem>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let item = Catalog::new(&state.store).add(item.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

pub async fn update_catalog_item(
    path: web::Path<String>,
    item: web::Json<CatalogItem>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let item = Catalog::new(&state.store)
        .update(&path.into_inner(), item.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

pub async fn delete_catalog_item(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    Catalog::new(&state.store).delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// Documents

#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintQuery {
    #[serde(default)]
    pub auto_print: bool,
}

pub async fn list_documents(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let documents = Documents::new(&state.store).list().await?;
    Ok(HttpResponse::Ok().json(documents))
}

pub async fn new_document(
    query: web::Query<TypeQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc_type = query.doc_type.unwrap_or_default();
    let doc = Documents::new(&state.store).create(doc_type).await?;
    Ok(HttpResponse::Created().json(doc))
}

pub async fn get_document(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc = Documents::new(&state.store).get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(doc))
}

pub async fn save_document(
    path: web::Path<String>,
    body: web::Json<Document>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let mut doc = body.into_inner();
    doc.id = path.into_inner();

    let doc = Documents::new(&state.store).save(doc).await?;
    Ok(HttpResponse::Ok().json(doc))
}

pub async fn delete_document(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    Documents::new(&state.store).delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn document_totals(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let totals = Documents::new(&state.store).totals(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(totals))
}

pub async fn finalize_document(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc = Documents::new(&state.store).finalize(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(doc))
}

pub async fn void_document(
    path: web::Path<String>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc = Documents::new(&state.store).void(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(doc))
}

pub async fn reissue_document(
    path: web::Path<String>,
    query: web::Query<TypeQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc = Documents::new(&state.store)
        .reissue(&path.into_inner(), query.doc_type)
        .await?;
    Ok(HttpResponse::Ok().json(doc))
}

pub async fn print_document(
    path: web::Path<String>,
    query: web::Query<PrintQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let doc = Documents::new(&state.store).get(&path.into_inner()).await?;
    let settings = state.store.settings().await?;
    let html = state
        .renderer
        .render_document(&doc, &settings, query.auto_print)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

// Reports

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    #[serde(default)]
    pub format: ReportFormat,
}

pub async fn report(
    query: web::Query<ReportQuery>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let ReportQuery { from, to, doc_type, format } = query.into_inner();
    let filter = ReportFilter { from, to, doc_type };
    let report = reports::build(&state.store, &filter).await?;

    if format == ReportFormat::Json {
        return Ok(HttpResponse::Ok().json(report));
    }

    let export = reports::export(report, format).await?;
    Ok(HttpResponse::Ok()
        .content_type(export.content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.body))
}

// Sync

pub async fn sync_all(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let remote = state.remote()?;
    let report = SyncEngine::new(&state.store, remote).run().await?;
    tracing::info!(?report, "Sincronización completada");
    Ok(HttpResponse::Ok().json(report))
}

pub async fn sync_pull(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let remote = state.remote()?;
    let report = SyncEngine::new(&state.store, remote).pull().await?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn sync_push(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let remote = state.remote()?;
    let report = SyncEngine::new(&state.store, remote).push().await?;
    Ok(HttpResponse::Ok().json(report))
}
