//! In-process router tests: drive the axum app with hand-built
//! multipart requests and assert on the JSON responses, without a
//! socket or a real recognizer.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{multipart_body, multipart_content_type, FixturePipeline};
use http_body_util::BodyExt;
use ocr_bridge::{router, AppState, BatchOcrResponse, OcrResponse, OcrService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const MAX_BODY: usize = 16 * 1024 * 1024;

fn app_with(fixture: FixturePipeline, ready: bool) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::clone(&fixture.calls);
    let service = OcrService::new(Box::new(fixture));
    if ready {
        service.mark_ready();
    }
    (router(Arc::new(AppState { service }), MAX_BODY), calls)
}

fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(body))
        .expect("request builds")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn single_file_round_trip() {
    let (app, calls) = app_with(FixturePipeline::new(), true);
    let body = multipart_body(&[("file", "report.pdf", b"%PDF-1.4".as_slice())]);

    let response = app.oneshot(post("/ocr", body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let parsed: OcrResponse = serde_json::from_value(body_json(response).await).expect("schema");
    assert_eq!(parsed.filename, "report.pdf");
    assert_eq!(parsed.page_count, 1);
    assert_eq!(parsed.page_count, parsed.pages.len());
    let page = &parsed.pages["report"];
    assert!(page.markdown.as_deref().unwrap().contains("report"));
    assert!(page.json.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unsupported_extension_rejected_before_any_processing() {
    let (app, calls) = app_with(FixturePipeline::new(), true);
    let body = multipart_body(&[("file", "notes.txt", b"hello".as_slice())]);

    let response = app.oneshot(post("/ocr", body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unsupported file type"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_file_field_is_400() {
    let (app, _) = app_with(FixturePipeline::new(), true);
    let body = multipart_body(&[("something_else", "report.pdf", b"%PDF".as_slice())]);

    let response = app.oneshot(post("/ocr", body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_mixes_multi_page_and_single_page_sources() {
    let fixture = FixturePipeline::new().with_pages("a", 2);
    let (app, calls) = app_with(fixture, true);
    let body = multipart_body(&[
        ("files", "a.pdf", b"%PDF-1.4".as_slice()),
        ("files", "b.png", b"\x89PNG".as_slice()),
    ]);

    let response = app
        .oneshot(post("/ocr/batch", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let parsed: BatchOcrResponse =
        serde_json::from_value(body_json(response).await).expect("schema");
    assert_eq!(parsed.filenames, vec!["a.pdf", "b.png"]);
    assert_eq!(parsed.page_count, 3);
    assert_eq!(parsed.page_count, parsed.pages.len());
    let names: Vec<&str> = parsed.pages.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a_0", "a_1", "b_0"]);
    // One pipeline call for the whole batch.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn batch_fails_fast_on_first_invalid_file() {
    let (app, calls) = app_with(FixturePipeline::new(), true);
    let body = multipart_body(&[
        ("files", "ok.pdf", b"%PDF".as_slice()),
        ("files", "bad.docx", b"PK".as_slice()),
        ("files", "fine.png", b"\x89PNG".as_slice()),
    ]);

    let response = app
        .oneshot(post("/ocr/batch", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("bad.docx"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_with_no_files_is_400() {
    let (app, _) = app_with(FixturePipeline::new(), true);
    let body = multipart_body(&[("unrelated", "x.pdf", b"%PDF".as_slice())]);

    let response = app
        .oneshot(post("/ocr/batch", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No files provided");
}

#[tokio::test]
async fn not_ready_service_answers_503() {
    let (app, calls) = app_with(FixturePipeline::new(), false);
    let body = multipart_body(&[("file", "report.pdf", b"%PDF".as_slice())]);

    let response = app.oneshot(post("/ocr", body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pipeline_fault_surfaces_as_500_with_cause() {
    let (app, _) = app_with(FixturePipeline::new().failing(), true);
    let body = multipart_body(&[("file", "report.pdf", b"%PDF".as_slice())]);

    let response = app.oneshot(post("/ocr", body)).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("recognizer crashed"));
}

#[tokio::test]
async fn root_redirects_to_docs() {
    let (app, _) = app_with(FixturePipeline::new(), true);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/docs"
    );
}
