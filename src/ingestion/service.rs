//! OCR orchestration: submission, status polling, cleanup, and cost.

use crate::blobstore::{TransientBlobStore, get_blob_store};
use crate::config::get_config;
use crate::ingestion::types::{DocumentStatus, SubmittedDocument};
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::ocr::{OcrClient, OcrError};
use async_trait::async_trait;
use std::sync::Arc;

/// Reference per-page OCR rate applied when `OCR_COST_PER_PAGE` is unset.
const DEFAULT_COST_PER_PAGE: f64 = 0.01;

/// Coordinates the document ingestion pipeline: submission to the remote OCR
/// service, status polling, best-effort transient-blob cleanup, and cost.
///
/// The service owns long-lived handles to the OCR client, the blob store, and
/// the metrics registry. Construct it once near process start and share it
/// through an `Arc`. Job state lives entirely on the remote side; each poll is
/// a single idempotent read plus an at-most-once cleanup attempt, and the
/// service performs no retries of its own.
pub struct IngestionService {
    pub(crate) ocr: OcrClient,
    pub(crate) blob_store: Option<Box<dyn TransientBlobStore>>,
    pub(crate) metrics: Arc<PipelineMetrics>,
    pub(crate) cost_per_page: f64,
}

/// Abstraction over the ingestion pipeline used by the HTTP surface.
#[async_trait]
pub trait IngestionApi: Send + Sync {
    /// Submit a scanned document for OCR and return the job handle.
    async fn submit(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<SubmittedDocument, OcrError>;

    /// Poll a job, firing cleanup and computing cost on completion.
    async fn check_status(
        &self,
        status_url: &str,
        text_url: Option<&str>,
        blob_ref: Option<&str>,
    ) -> Result<DocumentStatus, OcrError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl IngestionService {
    /// Build a new ingestion service from environment configuration.
    pub fn new(metrics: Arc<PipelineMetrics>) -> Result<Self, OcrError> {
        let config = get_config();
        Ok(Self {
            ocr: OcrClient::new()?,
            blob_store: get_blob_store(),
            metrics,
            cost_per_page: config.ocr_cost_per_page.unwrap_or(DEFAULT_COST_PER_PAGE),
        })
    }

    /// Submit a scanned document for OCR processing.
    ///
    /// Pure delegation to the OCR client; the only side effect is the HTTP call.
    pub async fn submit(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<SubmittedDocument, OcrError> {
        let job = self.ocr.submit(bytes, file_name, content_type).await?;
        self.metrics.record_submission();
        Ok(SubmittedDocument {
            job_id: job.job_id,
            status: job.status,
            status_url: job.status_url,
            text_url: job.text_url,
        })
    }

    /// Poll a job and normalize the result.
    ///
    /// When the job has completed and a `blob_ref` was supplied, the staged
    /// upload is deleted as best-effort cleanup; a cleanup failure is logged
    /// and swallowed, never surfaced to the caller. Cost is
    /// `max(page_count, 1) * cost_per_page` once completed, zero before.
    pub async fn check_status(
        &self,
        status_url: &str,
        text_url: Option<&str>,
        blob_ref: Option<&str>,
    ) -> Result<DocumentStatus, OcrError> {
        let job = self.ocr.fetch_status(status_url, text_url).await?;
        let completed = job.status.is_completed();
        self.metrics.record_status_check(completed);

        if completed && let Some(blob_ref) = blob_ref {
            self.cleanup_blob(blob_ref, &job.job_id).await;
        }

        let page_count = job.page_count.unwrap_or(1).max(1);
        let cost = if completed {
            f64::from(page_count) * self.cost_per_page
        } else {
            0.0
        };

        tracing::info!(
            job_id = %job.job_id,
            status = ?job.status,
            page_count,
            cost,
            "Status poll completed"
        );
        Ok(DocumentStatus {
            job_id: job.job_id,
            status: job.status,
            text: job.text,
            page_count,
            cost,
            error: job.error,
        })
    }

    async fn cleanup_blob(&self, blob_ref: &str, job_id: &str) {
        match &self.blob_store {
            Some(store) => {
                if let Err(error) = store.delete(blob_ref).await {
                    tracing::warn!(
                        job_id,
                        blob_ref,
                        error = %error,
                        "Transient blob cleanup failed; continuing"
                    );
                }
            }
            None => {
                tracing::debug!(job_id, blob_ref, "No blob store configured; skipping cleanup");
            }
        }
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl IngestionApi for IngestionService {
    async fn submit(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<SubmittedDocument, OcrError> {
        IngestionService::submit(self, bytes, file_name, content_type).await
    }

    async fn check_status(
        &self,
        status_url: &str,
        text_url: Option<&str>,
        blob_ref: Option<&str>,
    ) -> Result<DocumentStatus, OcrError> {
        IngestionService::check_status(self, status_url, text_url, blob_ref).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        IngestionService::metrics_snapshot(self)
    }
}
