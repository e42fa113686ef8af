//! Remote OCR job client: submission, status polling, and response normalization.

mod client;
mod extract;
mod types;

pub use client::OcrClient;
pub use types::{OcrError, OcrJob, OcrStatus};
