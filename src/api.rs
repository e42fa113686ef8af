//! HTTP surface for the docpipe pipelines.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /documents` – Submit a scanned document (multipart field `file`) to the remote
//!   OCR service and return the job handle (`job_id`, `status`, `status_url`, `text_url`).
//! - `POST /documents/status` – Poll a job by its self-constructed status URL; on completion
//!   the response carries extracted text, the page count, and the computed cost, and any
//!   supplied transient `blob_ref` is cleaned up best-effort.
//! - `POST /translate` – Translate text into English via the chunked pipeline, returning the
//!   reassembled text and the character-based cost.
//! - `GET /metrics` – Observe pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Handlers are generic over the service traits so they can be exercised against stubs.

use crate::ingestion::IngestionApi;
use crate::ocr::{OcrError, OcrStatus};
use crate::translation::{TranslationApi, TranslationError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Upper bound for uploaded scan size.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build the HTTP router exposing both pipelines.
pub fn create_router<I, T>(ingestion: Arc<I>, translation: Arc<T>) -> Router
where
    I: IngestionApi + 'static,
    T: TranslationApi + 'static,
{
    Router::new()
        .route("/documents", post(submit_document::<I, T>))
        .route("/documents/status", post(check_document_status::<I, T>))
        .route("/translate", post(translate_text::<I, T>))
        .route("/metrics", get(get_metrics::<I, T>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state((ingestion, translation))
}

/// Success response for the `POST /documents` endpoint.
#[derive(Serialize)]
struct SubmitResponse {
    /// Job identifier assigned by the remote OCR service.
    job_id: String,
    /// Initial lifecycle state.
    status: OcrStatus,
    /// URL to poll via `POST /documents/status`.
    status_url: String,
    /// URL for the extracted-text download, passed back on polls.
    text_url: String,
}

/// Submit a scanned document for OCR processing.
async fn submit_document<I, T>(
    State((ingestion, _)): State<(Arc<I>, Arc<T>)>,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, AppError>
where
    I: IngestionApi,
    T: TranslationApi,
{
    let mut upload: Option<(Vec<u8>, String, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("document").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::bad_request(err.to_string()))?
                .to_vec();
            upload = Some((bytes, file_name, content_type));
        }
    }

    let Some((bytes, file_name, content_type)) = upload else {
        return Err(AppError::bad_request("multipart field 'file' is required"));
    };
    if bytes.is_empty() {
        return Err(AppError::bad_request("uploaded file is empty"));
    }

    let submitted = ingestion.submit(bytes, &file_name, &content_type).await?;
    tracing::info!(job_id = %submitted.job_id, file_name, "Submission request completed");
    Ok(Json(SubmitResponse {
        job_id: submitted.job_id,
        status: submitted.status,
        status_url: submitted.status_url,
        text_url: submitted.text_url,
    }))
}

/// Request body for the `POST /documents/status` endpoint.
#[derive(Deserialize)]
struct StatusRequest {
    /// Status URL returned by submission.
    status_url: String,
    /// Optional text download URL returned by submission.
    #[serde(default)]
    text_url: Option<String>,
    /// Optional transient blob reference to clean up once the job completes.
    #[serde(default)]
    blob_ref: Option<String>,
}

/// Success response for the `POST /documents/status` endpoint.
#[derive(Serialize)]
struct StatusResponse {
    job_id: String,
    status: OcrStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    page_count: u32,
    cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Poll an OCR job and normalize the result.
async fn check_document_status<I, T>(
    State((ingestion, _)): State<(Arc<I>, Arc<T>)>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError>
where
    I: IngestionApi,
    T: TranslationApi,
{
    let status = ingestion
        .check_status(
            &request.status_url,
            request.text_url.as_deref(),
            request.blob_ref.as_deref(),
        )
        .await?;
    Ok(Json(StatusResponse {
        job_id: status.job_id,
        status: status.status,
        text: status.text,
        page_count: status.page_count,
        cost: status.cost,
        error: status.error,
    }))
}

/// Request body for the `POST /translate` endpoint.
#[derive(Deserialize)]
struct TranslateRequest {
    /// Text to translate into English.
    text: String,
    /// ISO-ish source language code; regional variants are normalized.
    source_language: String,
}

/// Success response for the `POST /translate` endpoint.
#[derive(Serialize)]
struct TranslateResponse {
    translated_text: String,
    source_language: String,
    cost: f64,
}

/// Translate text into English via the chunked pipeline.
async fn translate_text<I, T>(
    State((_, translation)): State<(Arc<I>, Arc<T>)>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError>
where
    I: IngestionApi,
    T: TranslationApi,
{
    let outcome = translation
        .translate(&request.text, &request.source_language)
        .await?;
    Ok(Json(TranslateResponse {
        translated_text: outcome.translated_text,
        source_language: outcome.source_language,
        cost: outcome.cost,
    }))
}

/// Return the current pipeline counters.
async fn get_metrics<I, T>(
    State((ingestion, _)): State<(Arc<I>, Arc<T>)>,
) -> Json<crate::metrics::MetricsSnapshot>
where
    I: IngestionApi,
    T: TranslationApi,
{
    Json(ingestion.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "submit_document",
                method: "POST",
                path: "/documents",
                description: "Submit a scanned document (multipart field 'file') for OCR. Response returns the job handle: { \"job_id\", \"status\", \"status_url\", \"text_url\" }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "check_document_status",
                method: "POST",
                path: "/documents/status",
                description: "Poll an OCR job. On completion the response carries extracted text, page count, and cost; a supplied blob_ref is cleaned up best-effort.",
                request_example: Some(json!({
                    "status_url": "https://ocr.example.org/ocr/v1/job-123",
                    "text_url": "https://ocr.example.org/ocr/v1/job-123/download/json",
                    "blob_ref": "upload-123"
                })),
            },
            CommandDescriptor {
                name: "translate",
                method: "POST",
                path: "/translate",
                description: "Translate text into English. Long input is chunked at sentence boundaries and reassembled losslessly; cost is based on source characters.",
                request_example: Some(json!({
                    "text": "Hola, ¿cómo estás?",
                    "source_language": "es"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return pipeline counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    BadRequest(String),
    Ocr(OcrError),
    Translation(TranslationError),
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Ocr(error) => (ocr_status_code(error), error.to_string()),
            Self::Translation(error) => (translation_status_code(error), error.to_string()),
        };
        (status, message).into_response()
    }
}

impl From<OcrError> for AppError {
    fn from(inner: OcrError) -> Self {
        Self::Ocr(inner)
    }
}

impl From<TranslationError> for AppError {
    fn from(inner: TranslationError) -> Self {
        Self::Translation(inner)
    }
}

fn ocr_status_code(error: &OcrError) -> StatusCode {
    match error {
        OcrError::InvalidStatusUrl(_) => StatusCode::BAD_REQUEST,
        OcrError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        OcrError::Http(_) | OcrError::UnexpectedStatus { .. } | OcrError::MissingJobId => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn translation_status_code(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TranslationError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TranslationError::Http(_)
        | TranslationError::RemoteStatus { .. }
        | TranslationError::MissingTranslation => StatusCode::BAD_GATEWAY,
    }
}
