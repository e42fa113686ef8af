#![deny(missing_docs)]

//! Core library for the docpipe ingestion server.
//!
//! Two pipelines share this crate: submitting scanned documents to a remote
//! OCR service and tracking the resulting job to completion, and translating
//! arbitrarily long text through a size-limited remote translation endpoint.

/// HTTP routing and REST handlers.
pub mod api;
/// Transient blob store collaborator used for post-OCR cleanup.
pub mod blobstore;
/// Environment-driven configuration management.
pub mod config;
/// OCR orchestration: submission, status polling, cleanup, and cost.
pub mod ingestion;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline activity counters.
pub mod metrics;
/// Low-level client for the remote OCR job API.
pub mod ocr;
/// Text chunking and translation orchestration.
pub mod translation;
