//! Transient blob store collaborator.
//!
//! Uploads are staged in a transient store while the OCR job runs; once the
//! job completes the staged blob is deleted as best-effort cleanup. The store
//! is reached through [`TransientBlobStore`] so orchestration code never
//! depends on the concrete transport.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors raised by the blob store client.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid blob store URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Store responded with an unexpected status code.
    #[error("Unexpected blob store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Delete-by-reference interface for the transient upload store.
#[async_trait]
pub trait TransientBlobStore: Send + Sync {
    /// Remove the blob behind `blob_ref`. Deleting an already-removed blob succeeds.
    async fn delete(&self, blob_ref: &str) -> Result<(), BlobStoreError>;
}

/// HTTP-backed blob store client.
pub struct HttpBlobStore {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl HttpBlobStore {
    /// Construct a client against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, BlobStoreError> {
        let client = Client::builder().user_agent("docpipe/0.1").build()?;
        let base_url = normalize_base_url(base_url).map_err(BlobStoreError::InvalidUrl)?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl TransientBlobStore for HttpBlobStore {
    async fn delete(&self, blob_ref: &str) -> Result<(), BlobStoreError> {
        let url = format!("{}/blobs/{blob_ref}", self.base_url.trim_end_matches('/'));
        let mut req = self.client.delete(&url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }

        let response = req.send().await?;
        match response.status() {
            status if status.is_success() => {
                tracing::debug!(blob_ref, "Transient blob deleted");
                Ok(())
            }
            // Already gone; a repeated cleanup attempt is not a failure.
            StatusCode::NOT_FOUND => {
                tracing::debug!(blob_ref, "Transient blob already absent");
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BlobStoreError::UnexpectedStatus { status, body })
            }
        }
    }
}

/// Build a blob store client when one is configured.
///
/// Returns `None` when `BLOB_STORE_URL` is unset or malformed; cleanup then
/// degrades to a logged no-op.
pub fn get_blob_store() -> Option<Box<dyn TransientBlobStore>> {
    let config = get_config();
    let base_url = config.blob_store_url.as_deref()?;
    match HttpBlobStore::with_base_url(base_url, config.blob_store_api_key.clone()) {
        Ok(store) => Some(Box::new(store)),
        Err(error) => {
            tracing::warn!(error = %error, "Blob store misconfigured; cleanup disabled");
            None
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}
