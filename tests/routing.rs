//! In-process routing tests: static assets, API fallbacks, middleware.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use caddyfile_editor::lifecycle::startup;

mod common;

async fn router(dir: &std::path::Path) -> axum::Router {
    std::fs::create_dir_all(dir.join("static/assets")).unwrap();
    std::fs::write(dir.join("static/index.html"), "<h1>Caddyfile editor</h1>").unwrap();
    std::fs::write(dir.join("static/assets/app.css"), "body {}").unwrap();

    // The control API is never reached by these tests.
    let config = common::test_config(dir, "http://127.0.0.1:9");
    startup::prepare(config).await.unwrap().router()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path()).await.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(body_text(response).await, "<h1>Caddyfile editor</h1>");
}

#[tokio::test]
async fn test_nested_static_file_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .await
        .oneshot(get("/assets/app.css"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/css"));
}

#[tokio::test]
async fn test_missing_static_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .await
        .oneshot(get("/nope.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_path_is_dedicated_404() {
    let dir = tempfile::tempdir().unwrap();
    // A static file with the same name must not be served.
    std::fs::create_dir_all(dir.path().join("static/api/caddyfile")).unwrap();
    std::fs::write(dir.path().join("static/api/caddyfile/xyz"), "static").unwrap();

    let response = router(dir.path())
        .await
        .oneshot(get("/api/caddyfile/xyz"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not found");
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .await
        .oneshot(get("/api/caddyfile/update"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(dir.path()).await;

    let response = app.clone().oneshot(get("/api/caddyfile")).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let request = Request::builder()
        .uri("/api/caddyfile")
        .header("x-request-id", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-42");
}
