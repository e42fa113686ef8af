//! HTTP client wrapper for the remote translation endpoint.

use crate::config::get_config;
use crate::translation::language::language_name;
use crate::translation::types::TranslationError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Maximum number of body characters embedded in remote-error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// Lightweight HTTP client for the remote translation API.
pub struct TranslationClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    data: Option<TranslateData>,
}

#[derive(Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize)]
struct TranslationEntry {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl TranslationClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, TranslationError> {
        let config = get_config();
        let client = Client::builder().user_agent("docpipe/0.1").build()?;
        let base_url =
            normalize_base_url(&config.translation_api_url).map_err(TranslationError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized translation HTTP client");

        Ok(Self {
            client,
            base_url,
            api_key: config.translation_api_key.clone(),
        })
    }

    /// Translate a single chunk from `source` into English.
    pub async fn translate_chunk(
        &self,
        chunk: &str,
        source: &str,
    ) -> Result<String, TranslationError> {
        let body = json!({
            "q": chunk,
            "source": source,
            "target": "en",
            "format": "text",
        });

        let url = format!(
            "{}/translate/v1/translate",
            self.base_url.trim_end_matches('/')
        );
        let mut req = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = truncate_body(response.text().await.unwrap_or_default());
            let error = TranslationError::RemoteStatus {
                language: language_name(source),
                status,
                body,
            };
            tracing::error!(source, status = %status, error = %error, "Chunk translation failed");
            return Err(error);
        }

        let payload: TranslateResponse = response.json().await?;
        payload
            .data
            .and_then(|data| data.translations.into_iter().next())
            .and_then(|entry| entry.translated_text)
            .ok_or_else(|| {
                tracing::error!(source, "Translation response carried no translated text");
                TranslationError::MissingTranslation
            })
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body;
    }
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
