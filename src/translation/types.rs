//! Core data types and error definitions for the translation pipeline.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors emitted by the translation pipeline.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Caller input was missing or malformed; retrying unchanged cannot succeed.
    #[error("Invalid translation input: {0}")]
    InvalidInput(String),
    /// Base URL failed to parse or normalize.
    #[error("Invalid translation API URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Remote endpoint returned a non-2xx status for one of the chunks.
    #[error("Failed to translate from {language} ({status}): {body}")]
    RemoteStatus {
        /// Human-readable source-language name.
        language: String,
        /// HTTP status returned by the translation API.
        status: StatusCode,
        /// Truncated body payload associated with the failing response.
        body: String,
    },
    /// A 2xx response was missing `data.translations[0].translatedText`.
    #[error("Translation response carried no translated text")]
    MissingTranslation,
}

/// Result of a completed translation.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Reassembled translated text, chunk order preserved.
    pub translated_text: String,
    /// Canonical source-language code actually sent to the remote service.
    pub source_language: String,
    /// Dollar cost based on the original (pre-translation) character count.
    pub cost: f64,
}
