//! HTTP transport: the gateway's axum router and handlers.
//!
//! Handler order per request: readiness check (503), extension
//! validation (400, before anything touches disk), staging, pipeline
//! invocation, response. The batch endpoint validates every file before
//! staging any of them — one bad extension rejects the whole batch with
//! nothing staged and no pipeline call made.

use crate::error::OcrError;
use crate::naming;
use crate::service::OcrService;
use crate::staging::StagingArea;
use crate::types::{BatchOcrResponse, OcrResponse, UploadedFile};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared per-process state injected into every handler.
pub struct AppState {
    pub service: OcrService,
}

/// Build the gateway router.
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/ocr", post(recognize_single))
        .route("/ocr/batch", post(recognize_batch))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

async fn docs() -> &'static str {
    concat!(
        "ocr-bridge ",
        env!("CARGO_PKG_VERSION"),
        "\n\n\
         POST /ocr        multipart field `file`  — recognise one document\n\
         POST /ocr/batch  multipart field `files` — recognise several documents in one pipeline call\n\
         GET  /docs       this page\n\n\
         Supported formats: pdf, png, jpg, jpeg, bmp, tiff, webp\n"
    )
}

/// `POST /ocr` — single-file recognition.
async fn recognize_single(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, AppError> {
    if !state.service.is_ready() {
        return Err(OcrError::NotReady.into());
    }

    let mut upload: Option<UploadedFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            upload = Some(UploadedFile { name, bytes });
        }
    }
    let upload = upload.ok_or(OcrError::MissingFile { field: "file" })?;

    if !naming::has_allowed_extension(&upload.name) {
        return Err(OcrError::UnsupportedExtension {
            filename: upload.name,
        }
        .into());
    }

    let staging = StagingArea::acquire()?;
    let staged = staging.stage_file(&upload.name, &upload.bytes).await?;

    info!("processing file: {}", upload.name);
    let pages = state
        .service
        .recognize(&[staged], staging.output_dir())
        .await?;
    info!("completed processing: {} ({} results)", upload.name, pages.len());

    Ok(Json(OcrResponse {
        filename: upload.name,
        page_count: pages.len(),
        pages,
    }))
}

/// `POST /ocr/batch` — multi-file recognition in one pipeline call.
async fn recognize_batch(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BatchOcrResponse>, AppError> {
    if !state.service.is_ready() {
        return Err(OcrError::NotReady.into());
    }

    let mut uploads: Vec<UploadedFile> = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("files") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            uploads.push(UploadedFile { name, bytes });
        }
    }
    if uploads.is_empty() {
        return Err(OcrError::NoFiles.into());
    }

    // Fail fast: every file validates before any file is staged.
    for upload in &uploads {
        if !naming::has_allowed_extension(&upload.name) {
            return Err(OcrError::UnsupportedExtension {
                filename: upload.name.clone(),
            }
            .into());
        }
    }

    let staging = StagingArea::acquire()?;
    let mut staged: Vec<PathBuf> = Vec::with_capacity(uploads.len());
    let mut filenames: Vec<String> = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        staged.push(staging.stage_file(&upload.name, &upload.bytes).await?);
        filenames.push(upload.name.clone());
    }

    info!("processing batch of {} files", staged.len());
    let pages = state
        .service
        .recognize(&staged, staging.output_dir())
        .await?;
    info!("completed batch processing: {} results", pages.len());

    Ok(Json(BatchOcrResponse {
        filenames,
        page_count: pages.len(),
        pages,
    }))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError(OcrError::BadMultipart(err.to_string()))
}

/// Response wrapper mapping [`OcrError`] onto HTTP statuses with an
/// `{"error": …}` body.
pub struct AppError(pub OcrError);

impl From<OcrError> for AppError {
    fn from(err: OcrError) -> Self {
        AppError(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            OcrError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {:?}", self.0);
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
