//! HTTP client wrapper for the remote OCR job API.

use crate::config::get_config;
use crate::ocr::extract;
use crate::ocr::types::{OcrError, OcrJob, OcrStatus};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;

/// Maximum number of body characters embedded in remote-error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// Lightweight HTTP client for the remote OCR job API.
///
/// Security invariant: both the status URL and the text download URL are
/// always derived from the configured base URL and the job id. There is no
/// code path that stores or returns a URL taken from a response body, so an
/// attacker- or infra-controlled URL is never followed.
pub struct OcrClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl OcrClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, OcrError> {
        let config = get_config();
        let client = Client::builder().user_agent("docpipe/0.1").build()?;

        let base_url = normalize_base_url(&config.ocr_api_url).map_err(OcrError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = %config
                .ocr_api_key
                .as_deref()
                .map(|value| !value.is_empty())
                .unwrap_or(false),
            "Initialized OCR HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.ocr_api_key.clone(),
        })
    }

    /// Submit a scanned document for OCR processing and return the job handle.
    pub async fn submit(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<OcrJob, OcrError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("file_name", file_name.to_string());

        let response = self
            .request(Method::POST, "ocr/v1/process")
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = truncate_body(response.text().await.unwrap_or_default());
            let error = OcrError::UnexpectedStatus { status, body };
            tracing::error!(file_name, error = %error, "OCR submission failed");
            return Err(error);
        }

        let body: Value = response.json().await?;
        let job_id = extract::job_id(&body).ok_or_else(|| {
            tracing::error!(file_name, "OCR submission response carried no job identifier");
            OcrError::MissingJobId
        })?;
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(OcrStatus::parse)
            .unwrap_or(OcrStatus::Queued);

        tracing::info!(job_id = %job_id, file_name, "OCR job submitted");
        Ok(OcrJob {
            status_url: self.status_url(&job_id),
            text_url: self.text_url(&job_id),
            job_id,
            status,
            page_count: None,
            text: None,
            error: None,
        })
    }

    /// Poll a job's status and, when completed, retrieve its extracted text.
    ///
    /// A failed text download degrades to a completed job without text rather
    /// than failing the poll.
    pub async fn fetch_status(
        &self,
        status_url: &str,
        text_url: Option<&str>,
    ) -> Result<OcrJob, OcrError> {
        let status_url = status_url.trim();
        if status_url.is_empty() || status_url == "null" || status_url == "undefined" {
            return Err(OcrError::InvalidStatusUrl(status_url.to_string()));
        }

        let response = self.get(status_url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = truncate_body(response.text().await.unwrap_or_default());
            let error = OcrError::UnexpectedStatus { status, body };
            tracing::error!(url = status_url, error = %error, "OCR status poll failed");
            return Err(error);
        }

        let body: Value = response.json().await?;
        let job_id =
            extract::job_id(&body).unwrap_or_else(|| trailing_segment(status_url).to_string());
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(OcrStatus::parse)
            .unwrap_or(OcrStatus::Processing);

        let mut text = extract::document_text(&body);
        if text.is_none()
            && status.is_completed()
            && let Some(url) = text_url.map(str::trim)
            && !url.is_empty()
        {
            text = self.fetch_text(url, &job_id).await;
        }

        Ok(OcrJob {
            job_id,
            status,
            status_url: status_url.to_string(),
            text_url: text_url.unwrap_or_default().trim().to_string(),
            page_count: extract::page_count(&body),
            text,
            error: extract::error_message(&body),
        })
    }

    async fn fetch_text(&self, text_url: &str, job_id: &str) -> Option<String> {
        match self.get(text_url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<Value>().await {
                    Ok(body) => extract::document_text(&body),
                    Err(error) => {
                        tracing::warn!(
                            job_id,
                            url = text_url,
                            error = %error,
                            "Extracted-text download returned an unreadable body"
                        );
                        None
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(
                    job_id,
                    url = text_url,
                    status = %response.status(),
                    "Extracted-text download failed; returning completed job without text"
                );
                None
            }
            Err(error) => {
                tracing::warn!(
                    job_id,
                    url = text_url,
                    error = %error,
                    "Extracted-text download failed; returning completed job without text"
                );
                None
            }
        }
    }

    fn status_url(&self, job_id: &str) -> String {
        format_endpoint(&self.base_url, &format!("ocr/v1/{job_id}"))
    }

    fn text_url(&self, job_id: &str) -> String {
        format_endpoint(&self.base_url, &format!("ocr/v1/{job_id}/download/json"))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.with_api_key(
            self.client
                .request(method, format_endpoint(&self.base_url, path)),
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_api_key(self.client.get(url))
    }

    fn with_api_key(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }
        req
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body;
    }
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

fn trailing_segment(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
