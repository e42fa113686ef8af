//! Ordered extraction strategies for the OCR API's variant response shapes.
//!
//! The remote service has drifted across deployments: the job identifier
//! appears under several field names and extracted text comes back either as
//! a flat field or as a `pages` array. Each concern is handled by a small
//! priority-ordered list of strategies rather than cascading conditionals.

use serde_json::Value;

const JOB_ID_FIELDS: [&str; 3] = ["id", "jobId", "job_id"];
const PAGE_COUNT_FIELDS: [&str; 2] = ["pageCount", "page_count"];
const TEXT_FIELDS: [&str; 3] = ["text", "extracted_text", "content"];
const PAGE_TEXT_FIELDS: [&str; 2] = ["text", "content"];

/// Separator inserted between pages when reassembling a paged response.
const PAGE_SEPARATOR: &str = "\n\n";

/// Text extraction strategies, tried in priority order.
const TEXT_STRATEGIES: [fn(&Value) -> Option<String>; 2] = [flat_text, paged_text];

/// Pull the job identifier out of a response body, trying each alias in order.
pub(crate) fn job_id(body: &Value) -> Option<String> {
    JOB_ID_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(stringify_id))
}

fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Pull the page count out of a response body, tolerating both casings.
pub(crate) fn page_count(body: &Value) -> Option<u32> {
    PAGE_COUNT_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_u64))
        .map(|count| count as u32)
}

/// Pull extracted document text out of a response body.
pub(crate) fn document_text(body: &Value) -> Option<String> {
    TEXT_STRATEGIES.iter().find_map(|strategy| strategy(body))
}

fn flat_text(body: &Value) -> Option<String> {
    TEXT_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .map(str::to_string)
}

fn paged_text(body: &Value) -> Option<String> {
    let pages = body.get("pages")?.as_array()?;
    let texts: Vec<&str> = pages
        .iter()
        .filter_map(|page| {
            PAGE_TEXT_FIELDS
                .iter()
                .find_map(|field| page.get(field).and_then(Value::as_str))
        })
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join(PAGE_SEPARATOR))
    }
}

/// Pull a failure message out of a response body.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
