use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use docpipe::{
    api, config, ingestion::IngestionService, metrics::PipelineMetrics,
    translation::TranslationService,
};
use httpmock::{Method::DELETE, Method::GET, Method::POST, MockServer};
use serde_json::json;
use tokio::sync::OnceCell;
use tower::ServiceExt;

static INIT: OnceCell<()> = OnceCell::const_new();
static MOCK_SERVER: OnceCell<&'static MockServer> = OnceCell::const_new();

fn set_env(key: &str, value: &str) {
    // SAFETY: Tests run in a single process and establish deterministic configuration upfront.
    unsafe { std::env::set_var(key, value) }
}

/// Start the shared mock upstream and install configuration pointing at it.
async fn mock_server() -> &'static MockServer {
    INIT.get_or_init(|| async {
        let mock_server = Box::leak(Box::new(MockServer::start_async().await));
        let base_url = mock_server.base_url();

        set_env("OCR_API_URL", &base_url);
        set_env("TRANSLATION_API_URL", &base_url);
        set_env("BLOB_STORE_URL", &base_url);

        MOCK_SERVER.set(mock_server).ok();
        config::init_config();
    })
    .await;
    MOCK_SERVER.get().expect("mock server initialized")
}

/// Build a fresh router wired to the mock upstream, with its own metrics.
fn app() -> Router {
    let metrics = Arc::new(PipelineMetrics::new());
    let ingestion = IngestionService::new(metrics.clone()).expect("ingestion service");
    let translation = TranslationService::new(metrics).expect("translation service");
    api::create_router(Arc::new(ingestion), Arc::new(translation))
}

fn multipart_upload(boundary: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"contract.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         %PDF-1.4 fake scan\r\n\
         --{boundary}--\r\n"
    )
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn document_lifecycle_submits_polls_and_cleans_up() {
    let server = mock_server().await;
    let base_url = server.base_url();

    // The submission response carries URLs pointing somewhere else entirely;
    // the service must hand back URLs derived from its own configuration.
    let submit = server
        .mock_async(|when, then| {
            when.method(POST).path("/ocr/v1/process");
            then.status(200).json_body(json!({
                "jobId": "int-job-1",
                "status": "queued",
                "statusUrl": "http://internal.invalid/ocr/v1/int-job-1",
                "textUrl": "http://internal.invalid/ocr/v1/int-job-1/download/json"
            }));
        })
        .await;
    let status = server
        .mock_async(|when, then| {
            when.method(GET).path("/ocr/v1/int-job-1");
            then.status(200)
                .json_body(json!({"id": "int-job-1", "status": "completed", "pageCount": 2}));
        })
        .await;
    let download = server
        .mock_async(|when, then| {
            when.method(GET).path("/ocr/v1/int-job-1/download/json");
            then.status(200)
                .json_body(json!({"pages": [{"text": "Page one."}, {"text": "Page two."}]}));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/blobs/int-upload-1");
            then.status(204);
        })
        .await;

    let app = app();
    let boundary = "X-DOCPIPE-IT-BOUNDARY";
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/documents")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_upload(boundary)))
                .expect("request"),
        )
        .await
        .expect("submit response");

    assert_eq!(response.status(), StatusCode::OK);
    let submitted = json_body(response).await;
    submit.assert_async().await;
    assert_eq!(submitted["job_id"], "int-job-1");
    assert_eq!(submitted["status"], "queued");
    assert_eq!(
        submitted["status_url"],
        format!("{base_url}/ocr/v1/int-job-1")
    );
    assert_eq!(
        submitted["text_url"],
        format!("{base_url}/ocr/v1/int-job-1/download/json")
    );

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/documents/status")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "status_url": submitted["status_url"],
                        "text_url": submitted["text_url"],
                        "blob_ref": "int-upload-1"
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("status response");

    assert_eq!(response.status(), StatusCode::OK);
    let polled = json_body(response).await;
    status.assert_async().await;
    download.assert_async().await;
    delete.assert_async().await;
    assert_eq!(polled["job_id"], "int-job-1");
    assert_eq!(polled["status"], "completed");
    assert_eq!(polled["text"], "Page one.\n\nPage two.");
    assert_eq!(polled["page_count"], 2);
    assert!((polled["cost"].as_f64().expect("cost") - 0.02).abs() < 1e-9);
}

#[tokio::test]
async fn translation_round_trip_charges_by_source_characters() {
    let server = mock_server().await;
    let text = "Hola, ¿cómo estás?";

    let translate = server
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

    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/translate")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"text": text, "source_language": "es"}).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("translate response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    translate.assert_async().await;
    assert_eq!(payload["translated_text"], "Hello, how are you?");
    assert_eq!(payload["source_language"], "es");
    let expected_cost = (text.chars().count() as f64 / 1000.0) * 0.30;
    assert!((payload["cost"].as_f64().expect("cost") - expected_cost).abs() < 1e-9);
}

#[tokio::test]
async fn english_input_passes_through_at_zero_cost() {
    mock_server().await;

    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/translate")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"text": "Already in English.", "source_language": "en"}).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("translate response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["translated_text"], "Already in English.");
    assert_eq!(payload["source_language"], "en");
    assert_eq!(payload["cost"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn metrics_reflect_pipeline_activity() {
    let server = mock_server().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/ocr/v1/int-job-2");
            then.status(200)
                .json_body(json!({"id": "int-job-2", "status": "processing"}));
        })
        .await;

    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/documents/status")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"status_url": format!("{}/ocr/v1/int-job-2", server.base_url())})
                        .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("status response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/metrics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("metrics response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["status_checks"], 1);
    assert_eq!(payload["documents_completed"], 0);
}
