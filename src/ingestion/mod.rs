//! Document ingestion pipeline: OCR submission, polling, cleanup, and cost.

mod service;
mod types;

pub use service::{IngestionApi, IngestionService};
pub use types::{DocumentStatus, SubmittedDocument};
