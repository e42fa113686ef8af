//! Translation orchestration: validation, chunking, sequential remote calls,
//! and reassembly.

use crate::config::get_config;
use crate::metrics::PipelineMetrics;
use crate::translation::chunker::split_text;
use crate::translation::client::TranslationClient;
use crate::translation::language::{language_name, normalize_language_code};
use crate::translation::types::{TranslationError, TranslationOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// Target language for all translations.
const TARGET_LANGUAGE: &str = "en";
/// Reference chunk budget (characters) applied when `TRANSLATION_CHUNK_SIZE` is unset.
const DEFAULT_CHUNK_SIZE: usize = 4000;
/// Reference rate applied when `TRANSLATION_COST_PER_1000_CHARS` is unset.
const DEFAULT_COST_PER_1000_CHARS: f64 = 0.30;

/// Coordinates the bounded-text translation pipeline.
///
/// Long input is split at sentence boundaries within the configured chunk
/// budget and translated chunk by chunk, strictly in order; the chunks are
/// then concatenated without separators so the original document structure
/// survives. All state is request-scoped.
pub struct TranslationService {
    pub(crate) client: TranslationClient,
    pub(crate) metrics: Arc<PipelineMetrics>,
    pub(crate) chunk_size: usize,
    pub(crate) cost_per_1000_chars: f64,
}

/// Abstraction over the translation pipeline used by the HTTP surface.
#[async_trait]
pub trait TranslationApi: Send + Sync {
    /// Translate `text` from `source_language` into English.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
    ) -> Result<TranslationOutcome, TranslationError>;
}

impl TranslationService {
    /// Build a new translation service from environment configuration.
    pub fn new(metrics: Arc<PipelineMetrics>) -> Result<Self, TranslationError> {
        let config = get_config();
        Ok(Self {
            client: TranslationClient::new()?,
            metrics,
            chunk_size: config.translation_chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            cost_per_1000_chars: config
                .translation_cost_per_1000_chars
                .unwrap_or(DEFAULT_COST_PER_1000_CHARS),
        })
    }

    /// Translate `text` from `source_language` into English.
    ///
    /// English input short-circuits at zero cost without any remote call. Any
    /// chunk failure aborts the whole translation; no partial output is ever
    /// returned. Cost is based on the original character count, not the
    /// translated output.
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
    ) -> Result<TranslationOutcome, TranslationError> {
        if text.is_empty() {
            return Err(TranslationError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }
        if source_language.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "source language must be provided".to_string(),
            ));
        }

        let source = normalize_language_code(source_language);
        if source == TARGET_LANGUAGE {
            return Ok(TranslationOutcome {
                translated_text: text.to_string(),
                source_language: source,
                cost: 0.0,
            });
        }

        let chunks = split_text(text, self.chunk_size);
        tracing::debug!(
            language = %source,
            chunks = chunks.len(),
            chunk_size = self.chunk_size,
            "Translating document"
        );

        // Chunks go out strictly in order; reassembly depends on it, and the
        // remote API makes no ordering guarantee across parallel calls.
        let mut translated = String::with_capacity(text.len());
        for chunk in &chunks {
            translated.push_str(&self.client.translate_chunk(chunk, &source).await?);
        }

        let cost = (text.chars().count() as f64 / 1000.0) * self.cost_per_1000_chars;
        self.metrics.record_translation(chunks.len() as u64);
        tracing::info!(
            language = %language_name(&source),
            chunks = chunks.len(),
            cost,
            "Translation completed"
        );

        Ok(TranslationOutcome {
            translated_text: translated,
            source_language: source,
            cost,
        })
    }
}

#[async_trait]
impl TranslationApi for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
    ) -> Result<TranslationOutcome, TranslationError> {
        TranslationService::translate(self, text, source_language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use reqwest::Client;
    use serde_json::json;

    fn test_service(server: &MockServer, chunk_size: usize) -> TranslationService {
        TranslationService {
            client: TranslationClient {
                client: Client::builder()
                    .user_agent("docpipe-test")
                    .build()
                    .expect("client"),
                base_url: server.base_url(),
                api_key: None,
            },
            metrics: Arc::new(PipelineMetrics::new()),
            chunk_size,
            cost_per_1000_chars: 0.30,
        }
    }

    #[tokio::test]
    async fn rejects_empty_input() {
        let server = MockServer::start_async().await;
        let service = test_service(&server, 4000);

        let error = service.translate("", "es").await.unwrap_err();
        assert!(matches!(error, TranslationError::InvalidInput(_)));

        let error = service.translate("Hola", "  ").await.unwrap_err();
        assert!(matches!(error, TranslationError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn english_short_circuits_without_remote_calls() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate");
                then.status(200).json_body(json!({}));
            })
            .await;
        let service = test_service(&server, 4000);

        let outcome = service
            .translate("Already in English.", "en")
            .await
            .expect("short circuit");

        mock.assert_hits(0);
        assert_eq!(outcome.translated_text, "Already in English.");
        assert_eq!(outcome.source_language, "en");
        assert_eq!(outcome.cost, 0.0);
    }

    #[tokio::test]
    async fn translates_and_charges_by_source_characters() {
        let server = MockServer::start_async().await;
        let text = "Hola, ¿cómo estás?";
        server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": text,
                    "source": "es",
                    "target": "en",
                    "format": "text",
                }));
                then.status(200).json_body(json!({
                    "data": {"translations": [{"translatedText": "Hello, how are you?"}]}
                }));
            })
            .await;
        let service = test_service(&server, 4000);

        let outcome = service.translate(text, "es").await.expect("translation");

        assert_eq!(outcome.translated_text, "Hello, how are you?");
        assert_eq!(outcome.source_language, "es");
        let expected_cost = (text.chars().count() as f64 / 1000.0) * 0.30;
        assert!((outcome.cost - expected_cost).abs() < 1e-9);
    }

    #[tokio::test]
    async fn regional_variants_are_normalized_before_the_remote_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": "你好",
                    "source": "zh",
                    "target": "en",
                    "format": "text",
                }));
                then.status(200).json_body(json!({
                    "data": {"translations": [{"translatedText": "Hello"}]}
                }));
            })
            .await;
        let service = test_service(&server, 4000);

        let outcome = service.translate("你好", "zh-TW").await.expect("translation");
        mock.assert();
        assert_eq!(outcome.source_language, "zh");
    }

    #[tokio::test]
    async fn long_input_is_chunked_and_reassembled_in_order() {
        let server = MockServer::start_async().await;
        let text = "One. Two. Three.";
        // chunk budget 10 splits this into "One. Two. " and "Three."
        let first = server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": "One. Two. ",
                    "source": "es",
                    "target": "en",
                    "format": "text",
                }));
                then.status(200).json_body(json!({
                    "data": {"translations": [{"translatedText": "UNO. DOS. "}]}
                }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": "Three.",
                    "source": "es",
                    "target": "en",
                    "format": "text",
                }));
                then.status(200).json_body(json!({
                    "data": {"translations": [{"translatedText": "TRES."}]}
                }));
            })
            .await;
        let service = test_service(&server, 10);

        let outcome = service.translate(text, "es").await.expect("translation");

        first.assert();
        second.assert();
        assert_eq!(outcome.translated_text, "UNO. DOS. TRES.");
        assert_eq!(service.metrics.snapshot().chunks_translated, 2);
    }

    #[tokio::test]
    async fn chunk_failure_aborts_the_whole_translation() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": "One. Two. ",
                    "source": "es",
                    "target": "en",
                    "format": "text",
                }));
                then.status(200).json_body(json!({
                    "data": {"translations": [{"translatedText": "UNO. DOS. "}]}
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/translate/v1/translate").json_body(json!({
                    "q": "Three.",
                    "source": "es",
                    "target": "en",
                    "format": "text",
                }));
                then.status(500).body("engine crashed");
            })
            .await;
        let service = test_service(&server, 10);

        let error = service.translate("One. Two. Three.", "es").await.unwrap_err();

        assert!(error.to_string().contains("Spanish"));
        assert!(matches!(error, TranslationError::RemoteStatus { .. }));
        // Nothing was recorded for the aborted translation.
        assert_eq!(service.metrics.snapshot().translations_completed, 0);
    }
}
