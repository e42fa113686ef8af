use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity.
///
/// Per-request dollar cost is reported in each response payload and aggregated
/// by callers; counters here deliberately track volumes only, so repeated
/// polls of an already-completed job cannot double count anything billable.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_submitted: AtomicU64,
    status_checks: AtomicU64,
    documents_completed: AtomicU64,
    translations_completed: AtomicU64,
    chunks_translated: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document submitted to the remote OCR service.
    pub fn record_submission(&self) {
        self.documents_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a status poll, noting whether the job reported completion.
    pub fn record_status_check(&self, completed: bool) {
        self.status_checks.fetch_add(1, Ordering::Relaxed);
        if completed {
            self.documents_completed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a finished translation and the number of chunks it required.
    pub fn record_translation(&self, chunk_count: u64) {
        self.translations_completed.fetch_add(1, Ordering::Relaxed);
        self.chunks_translated
            .fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_submitted: self.documents_submitted.load(Ordering::Relaxed),
            status_checks: self.status_checks.load(Ordering::Relaxed),
            documents_completed: self.documents_completed.load(Ordering::Relaxed),
            translations_completed: self.translations_completed.load(Ordering::Relaxed),
            chunks_translated: self.chunks_translated.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents submitted for OCR since startup.
    pub documents_submitted: u64,
    /// Number of status polls handled since startup.
    pub status_checks: u64,
    /// Number of polls that observed a completed job.
    pub documents_completed: u64,
    /// Number of translations completed since startup.
    pub translations_completed: u64,
    /// Total chunk count sent to the translation endpoint.
    pub chunks_translated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_submissions_and_polls() {
        let metrics = PipelineMetrics::new();
        metrics.record_submission();
        metrics.record_status_check(false);
        metrics.record_status_check(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_submitted, 1);
        assert_eq!(snapshot.status_checks, 2);
        assert_eq!(snapshot.documents_completed, 1);
    }

    #[test]
    fn records_translations_and_chunks() {
        let metrics = PipelineMetrics::new();
        metrics.record_translation(3);
        metrics.record_translation(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.translations_completed, 2);
        assert_eq!(snapshot.chunks_translated, 4);
    }

    #[test]
    fn snapshot_is_consistent() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.snapshot().documents_submitted, 0);
        assert_eq!(metrics.snapshot().status_checks, 0);
        assert_eq!(metrics.snapshot().translations_completed, 0);
    }
}
