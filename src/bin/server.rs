//! HTTP front door for pdf2flipbook.
//!
//! Endpoints:
//! - `POST /api/convert` — multipart upload; returns a ZIP attachment, an
//!   S3 URL map, or inline base64 JSON depending on `destination`
//! - `POST /api/convert-base64` — JSON body with a base64 PDF in, base64
//!   ZIP out (the shape cloud-function gateways speak)
//! - `GET /api/conversions` — recent conversion log records
//! - `GET /api/stats` — aggregate conversion counters
//! - `GET /health`
//!
//! The conversion log is best-effort: if the database is unavailable the
//! server still converts, and a failed insert never changes a response.

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use pdf2flipbook::log::{ConversionLog, RecordStatus};
use pdf2flipbook::output::slugify;
use pdf2flipbook::{
    convert_blocking, package, ConversionConfig, ConversionRequest, ConversionResult,
    FlipbookError, ViewerOptions,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

// ── Configuration & state ────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ServerConfig {
    port: u16,
    database_url: String,
    s3_bucket: Option<String>,
    s3_region: String,
    /// Include error detail in responses (development front doors only).
    dev_mode: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://flipbook.db".to_string()),
            s3_bucket: std::env::var("AWS_S3_BUCKET").ok().filter(|b| !b.is_empty()),
            s3_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            dev_mode: std::env::var("FLIPBOOK_DEV").map(|v| v == "1").unwrap_or(false),
        }
    }
}

#[derive(Clone)]
struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    log: Option<ConversionLog>,
}

impl AppState {
    fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    fn log(&self) -> Option<&ConversionLog> {
        self.inner.log.as_ref()
    }

    /// Append a log record, swallowing any failure.
    async fn record_outcome(
        &self,
        account: &str,
        title: &str,
        page_count: usize,
        destination_url: Option<&str>,
        status: RecordStatus,
        error_message: Option<&str>,
    ) {
        if let Some(log) = self.log() {
            if let Err(e) = log
                .record(account, title, page_count, destination_url, status, error_message)
                .await
            {
                tracing::warn!("Failed to record conversion outcome: {e}");
            }
        }
    }
}

// ── Error responses ──────────────────────────────────────────────────────

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Convert(FlipbookError),
    Internal(String),
}

impl From<FlipbookError> for ApiError {
    fn from(e: FlipbookError) -> Self {
        ApiError::Convert(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Convert(FlipbookError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Convert(FlipbookError::Decode { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Convert(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Convert(e) => e.to_string(),
        }
    }

    /// Render with or without debug detail; production suppresses it.
    fn into_response_for(self, dev_mode: bool) -> Response {
        let detail = dev_mode.then(|| format!("{self:?}"));
        let body = Json(ErrorBody {
            error: self.message(),
            detail,
        });
        (self.status(), body).into_response()
    }
}

// ── Request / response payloads ──────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct ConvertBase64Request {
    /// Base64-encoded PDF payload.
    body: String,
    title: Option<String>,
}

#[derive(Serialize)]
struct ConvertBase64Response {
    success: bool,
    filename: String,
    zip_base64: String,
    page_count: usize,
}

#[derive(Serialize)]
struct InlineJsonResponse {
    success: bool,
    html: String,
    css: String,
    js: String,
    pages: Vec<String>,
    thumbs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_data: Option<String>,
    page_count: usize,
}

#[derive(Deserialize)]
struct HistoryQuery {
    account: Option<String>,
    limit: Option<i64>,
}

/// Parsed `POST /api/convert` form.
struct ConvertForm {
    pdf: Vec<u8>,
    title: String,
    account: String,
    destination: String,
    ocr: bool,
    ocr_lang: String,
    download: bool,
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn parse_convert_form(mut multipart: Multipart) -> Result<ConvertForm, ApiError> {
    let mut pdf = None;
    let mut title = "Zpravodaj".to_string();
    let mut account = "default".to_string();
    let mut destination = "zip".to_string();
    let mut ocr = false;
    let mut ocr_lang = "ces".to_string();
    let mut download = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
                pdf = Some(bytes.to_vec());
            }
            "title" => title = read_text_field(field).await?,
            "account" => account = read_text_field(field).await?,
            "destination" => destination = read_text_field(field).await?.to_lowercase(),
            "ocr" => ocr = read_text_field(field).await?.parse().unwrap_or(false),
            "ocr_lang" => ocr_lang = read_text_field(field).await?,
            "download" => download = read_text_field(field).await?.parse().unwrap_or(false),
            _ => {}
        }
    }

    let pdf = pdf.ok_or_else(|| ApiError::BadRequest("PDF file is required".to_string()))?;
    Ok(ConvertForm {
        pdf,
        title,
        account,
        destination,
        ocr,
        ocr_lang,
        download,
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed form field: {e}")))
}

fn build_config(form: &ConvertForm) -> Result<ConversionConfig, ApiError> {
    ConversionConfig::builder()
        .extract_text(form.ocr)
        .ocr_language(form.ocr_lang.clone())
        .include_source_pdf(form.download)
        .viewer(ViewerOptions {
            download_button: form.download,
            ..ViewerOptions::default()
        })
        .build()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn convert_endpoint(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let dev_mode = state.config().dev_mode;
    match convert_endpoint_inner(&state, multipart).await {
        Ok(response) => response,
        Err(e) => e.into_response_for(dev_mode),
    }
}

async fn convert_endpoint_inner(
    state: &AppState,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = parse_convert_form(multipart).await?;
    let config = build_config(&form)?;
    let request = ConversionRequest::new(std::mem::take(&mut form.pdf), form.title.clone());

    let result = match convert_blocking(request, config).await {
        Ok(result) => result,
        Err(e) => {
            state
                .record_outcome(
                    &form.account,
                    &form.title,
                    0,
                    None,
                    RecordStatus::Error,
                    Some(&e.to_string()),
                )
                .await;
            return Err(e.into());
        }
    };

    match form.destination.as_str() {
        "zip" => zip_response(&result),
        "json" => Ok(Json(inline_json(&result)).into_response()),
        "s3" => s3_response(state, &form, &result).await,
        other => Err(ApiError::BadRequest(format!(
            "unknown destination '{other}' (expected zip, s3 or json)"
        ))),
    }
}

fn zip_response(result: &ConversionResult) -> Result<Response, ApiError> {
    let bytes = package::zip::write(result)?;
    let filename = format!("{}-flipbook.zip", slugify(&result.title));
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn inline_json(result: &ConversionResult) -> InlineJsonResponse {
    InlineJsonResponse {
        success: true,
        html: result.assets.html.clone(),
        css: result.assets.css.clone(),
        js: result.assets.js.clone(),
        pages: result.pages.iter().map(|p| BASE64.encode(&p.full)).collect(),
        thumbs: result.pages.iter().map(|p| BASE64.encode(&p.thumb)).collect(),
        search_data: result.search.as_ref().map(|s| s.to_json()),
        page_count: result.page_count,
    }
}

#[cfg(feature = "s3")]
async fn s3_response(
    state: &AppState,
    form: &ConvertForm,
    result: &ConversionResult,
) -> Result<Response, ApiError> {
    let bucket = state
        .config()
        .s3_bucket
        .clone()
        .ok_or_else(|| ApiError::BadRequest("S3 bucket not configured (AWS_S3_BUCKET)".into()))?;
    let region = state.config().s3_region.clone();

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let prefix = format!("{}/{}-{}", form.account, slugify(&form.title), timestamp);

    let packager = package::s3::S3Packager::from_env(bucket, region).await;
    match packager.upload(result, &prefix).await {
        Ok(urls) => {
            state
                .record_outcome(
                    &form.account,
                    &form.title,
                    result.page_count,
                    Some(&urls.index_url),
                    RecordStatus::Success,
                    None,
                )
                .await;
            Ok(Json(serde_json::json!({
                "success": true,
                "urls": urls,
                "page_count": result.page_count,
            }))
            .into_response())
        }
        Err(e) => {
            state
                .record_outcome(
                    &form.account,
                    &form.title,
                    result.page_count,
                    None,
                    RecordStatus::Error,
                    Some(&e.to_string()),
                )
                .await;
            Err(e.into())
        }
    }
}

#[cfg(not(feature = "s3"))]
async fn s3_response(
    _state: &AppState,
    _form: &ConvertForm,
    _result: &ConversionResult,
) -> Result<Response, ApiError> {
    Err(ApiError::BadRequest(
        "this server was built without S3 support (enable the `s3` feature)".into(),
    ))
}

async fn convert_base64_endpoint(
    State(state): State<AppState>,
    Json(request): Json<ConvertBase64Request>,
) -> Response {
    let dev_mode = state.config().dev_mode;
    match convert_base64_inner(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response_for(dev_mode),
    }
}

async fn convert_base64_inner(
    request: ConvertBase64Request,
) -> Result<ConvertBase64Response, ApiError> {
    let pdf = BASE64
        .decode(request.body.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("body is not valid base64: {e}")))?;
    let title = request.title.unwrap_or_else(|| "Zpravodaj".to_string());

    let config = ConversionConfig::default();
    let result = convert_blocking(ConversionRequest::new(pdf, title.clone()), config).await?;

    let zip_bytes = package::zip::write(&result)?;
    Ok(ConvertBase64Response {
        success: true,
        filename: format!("{}-flipbook.zip", slugify(&title)),
        zip_base64: BASE64.encode(&zip_bytes),
        page_count: result.page_count,
    })
}

async fn list_conversions(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let dev_mode = state.config().dev_mode;
    let Some(log) = state.log() else {
        return ApiError::Internal("conversion log unavailable".into())
            .into_response_for(dev_mode);
    };
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    match log.list(query.account.as_deref(), limit).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response_for(dev_mode),
    }
}

async fn get_stats(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> Response {
    let dev_mode = state.config().dev_mode;
    let Some(log) = state.log() else {
        return ApiError::Internal("conversion log unavailable".into())
            .into_response_for(dev_mode);
    };
    match log.stats(query.account.as_deref()).await {
        Ok(totals) => Json(totals).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response_for(dev_mode),
    }
}

// ── Entry point ──────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flipbook_server=info,tower_http=info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    tracing::info!("Starting flipbook-server v{}", env!("CARGO_PKG_VERSION"));
    match config.s3_bucket {
        Some(ref bucket) => {
            tracing::info!("S3 destination: s3://{} ({})", bucket, config.s3_region)
        }
        None => tracing::info!("S3 destination not configured"),
    }

    // A missing database degrades logging, never conversion.
    let log = match ConversionLog::connect(&config.database_url).await {
        Ok(log) => Some(log),
        Err(e) => {
            tracing::warn!(
                "Conversion log unavailable ({e}); /api/conversions and /api/stats disabled"
            );
            None
        }
    };

    let state = AppState {
        inner: Arc::new(AppStateInner { config: config.clone(), log }),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/convert", post(convert_endpoint))
        .route("/api/convert-base64", post(convert_base64_endpoint))
        .route("/api/conversions", get(list_conversions))
        .route("/api/stats", get(get_stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("flipbook-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server port");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down…");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down…");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_400() {
        let e = ApiError::Convert(FlipbookError::InvalidInput {
            reason: "empty".into(),
        });
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decode_errors_map_to_422() {
        let e = ApiError::Convert(FlipbookError::Decode {
            detail: "corrupt".into(),
        });
        assert_eq!(e.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn packaging_errors_map_to_500() {
        let e = ApiError::Convert(FlipbookError::Packaging {
            destination: "zip:index.html".into(),
            detail: "io".into(),
        });
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
