use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use file_relay::storage::InMemoryStore;
use file_relay::{create_router, AppState, FileService};

const BOUNDARY: &str = "local-server-boundary";

fn app(store: &InMemoryStore, temp_dir: &TempDir) -> axum::Router {
    let service = FileService::new(Arc::new(store.clone()), temp_dir.path());
    create_router(AppState { service })
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_health() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&InMemoryStore::new(), &temp_dir);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_upload_then_download_over_http() {
    let temp_dir = TempDir::new().unwrap();
    let store = InMemoryStore::new();

    let upload = app(&store, &temp_dir)
        .oneshot(
            Request::post("/files")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body("notes.txt", b"lab notes, day 3")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(upload.status(), StatusCode::OK);
    assert_eq!(upload.headers()["content-type"], "application/json");
    let body = to_bytes(upload.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"{}");
    assert_eq!(&store.get("notes.txt").await.unwrap()[..], b"lab notes, day 3");

    let download = app(&store, &temp_dir)
        .oneshot(
            Request::get("/files?filename=notes.txt")
                .header("content-type", "text/plain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(
        download.headers()["content-disposition"],
        "attachment; filename=notes.txt"
    );
    assert_eq!(download.headers()["content-type"], "text/plain");
    let body = to_bytes(download.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"lab notes, day 3");
}

#[tokio::test]
async fn test_download_of_missing_object_is_500() {
    let temp_dir = TempDir::new().unwrap();

    let response = app(&InMemoryStore::new(), &temp_dir)
        .oneshot(
            Request::get("/?filename=nothing.bin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unsupported_method_is_400() {
    let temp_dir = TempDir::new().unwrap();

    let response = app(&InMemoryStore::new(), &temp_dir)
        .oneshot(
            Request::delete("/files?filename=notes.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_gateway_event_round_trip_through_handler() {
    let temp_dir = TempDir::new().unwrap();
    let store = InMemoryStore::new();
    let service = FileService::new(Arc::new(store.clone()), temp_dir.path());

    let event = serde_json::json!({
        "httpMethod": "POST",
        "headers": {"Content-Type": format!("multipart/form-data; boundary={BOUNDARY}")},
        "queryStringParameters": null,
        "body": BASE64.encode(multipart_body("event.txt", b"from the gateway")),
        "isBase64Encoded": true
    });
    let request: file_relay::GatewayRequest = serde_json::from_value(event).unwrap();

    let response = file_relay::dispatch(&service, &request).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["body"], "{}");
    assert_eq!(&store.get("event.txt").await.unwrap()[..], b"from the gateway");
}
