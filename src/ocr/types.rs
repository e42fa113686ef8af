//! Shared types used by the OCR job client.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Errors returned while interacting with the remote OCR API.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid OCR API URL: {0}")]
    InvalidUrl(String),
    /// Caller supplied an empty or placeholder status URL.
    #[error("Status URL is missing or malformed: {0:?}")]
    InvalidStatusUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Remote API responded with an unexpected status code.
    #[error("Unexpected OCR response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the OCR API.
        status: StatusCode,
        /// Truncated body payload associated with the failing response.
        body: String,
    },
    /// A 2xx submission response carried no job identifier under any known field.
    #[error("OCR response carried no job identifier")]
    MissingJobId,
}

/// Lifecycle states reported by the remote OCR service.
///
/// `Pending`, `Queued`, and `Processing` are all "not yet done" from the
/// caller's perspective; only `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrStatus {
    /// Job accepted but not yet picked up.
    Queued,
    /// Job is being processed.
    Processing,
    /// Alias some response shapes use for a not-yet-done job.
    Pending,
    /// Job finished successfully; text may be available.
    Completed,
    /// Job finished unsuccessfully; an error message may be available.
    Failed,
}

impl OcrStatus {
    /// Map a remote status string onto the lifecycle enum.
    ///
    /// Unrecognized values degrade to `Processing` so a new remote status
    /// keeps the caller polling instead of failing the request.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "queued" => Self::Queued,
            "pending" => Self::Pending,
            "completed" | "complete" | "succeeded" => Self::Completed,
            "failed" | "error" => Self::Failed,
            _ => Self::Processing,
        }
    }

    /// Whether the job finished successfully.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the job reached a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of a remote OCR job as observed by a single request.
///
/// Instances are transient: created by submission or re-fetched on each poll,
/// never persisted or mutated locally. `status_url` and `text_url` are always
/// derived from the configured base URL plus the job id.
#[derive(Debug, Clone)]
pub struct OcrJob {
    /// Opaque identifier assigned by the remote service.
    pub job_id: String,
    /// Last observed lifecycle state.
    pub status: OcrStatus,
    /// Self-constructed URL for polling job status.
    pub status_url: String,
    /// Self-constructed URL for downloading extracted text.
    pub text_url: String,
    /// Page count reported by the remote service, when present.
    pub page_count: Option<u32>,
    /// Extracted text, present only when the job completed.
    pub text: Option<String>,
    /// Failure message, present only when the job failed.
    pub error: Option<String>,
}
