//! Caller-facing result types for the OCR ingestion pipeline.

use crate::ocr::OcrStatus;

/// Job handle returned by a successful submission.
#[derive(Debug, Clone)]
pub struct SubmittedDocument {
    /// Identifier assigned by the remote OCR service.
    pub job_id: String,
    /// Initial lifecycle state reported at submission.
    pub status: OcrStatus,
    /// Self-constructed URL the caller polls for status.
    pub status_url: String,
    /// Self-constructed URL for downloading extracted text.
    pub text_url: String,
}

/// Normalized status-poll result, including computed cost.
#[derive(Debug, Clone)]
pub struct DocumentStatus {
    /// Identifier assigned by the remote OCR service.
    pub job_id: String,
    /// Lifecycle state observed by this poll.
    pub status: OcrStatus,
    /// Extracted text, present only when the job completed.
    pub text: Option<String>,
    /// Page count used for cost computation; defaults to 1 when the remote omits it.
    pub page_count: u32,
    /// Dollar cost of the completed job; zero until completion.
    pub cost: f64,
    /// Failure message, present only when the job failed.
    pub error: Option<String>,
}
