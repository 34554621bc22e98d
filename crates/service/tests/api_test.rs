use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use image::{Rgba, RgbaImage};
use serde_json::{Value, json};
use signet_service::{build_router, config::Config, state::AppState};
use signet_store::{FilesystemRasterStore, MemoryRasterStore, RasterStore, SlotKey};
use signet_types::Raster;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn memory_app() -> (Router, Arc<dyn RasterStore>) {
    let store: Arc<dyn RasterStore> = Arc::new(MemoryRasterStore::new());
    let app = build_router(AppState::new(store.clone(), Config::default()));
    (app, store)
}

fn signature_uri() -> (String, Raster) {
    let pixels = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let raster = Raster::from_rgba(&pixels).unwrap();
    (signet_capture::encode_raster(&raster), raster)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), disposition)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = memory_app();
    let (status, body, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn index_serves_capture_page() {
    let (app, _) = memory_app();
    let (status, body, _) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<canvas"));
    assert!(html.contains("/save_canvas"));
}

#[tokio::test]
async fn nothing_is_stored_before_first_save() {
    let (app, _) = memory_app();

    let (status, body, _) = send(&app, get("/retrieve_canvas")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({ "image": null }));

    let (status, body, _) = send(&app, get("/download_canvas")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "NotFound");
}

#[tokio::test]
async fn save_then_retrieve_and_download() {
    let (app, store) = memory_app();
    let (uri, raster) = signature_uri();

    let (status, body, _) = send(
        &app,
        post_json("/save_canvas", json!({ "image": uri }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["url"], "/download_canvas");

    let stored = store.load(&SlotKey::signature()).unwrap().unwrap();
    assert_eq!(stored, raster.as_bytes());

    let (status, body, _) = send(&app, get("/retrieve_canvas")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let returned = signet_capture::decode(json["image"].as_str().unwrap()).unwrap();
    assert_eq!(returned.to_rgba8().unwrap(), raster.to_rgba8().unwrap());

    let (status, body, disposition) = send(&app, get("/download_canvas")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        disposition.as_deref(),
        Some("attachment; filename=\"signature.png\"")
    );
    assert_eq!(body, raster.as_bytes());
}

#[tokio::test]
async fn malformed_payloads_are_rejected_without_storing() {
    let (app, store) = memory_app();

    for image in ["not-a-data-uri", "data:image/png;base64,aGVsbG8=", "data:image/png;base64,!!"] {
        let (status, body, _) = send(
            &app,
            post_json("/save_canvas", json!({ "image": image }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", image);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "MalformedPayload");
    }

    let (status, body, _) = send(&app, post_json("/save_canvas", "{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "InvalidRequest");

    assert!(store.load(&SlotKey::signature()).unwrap().is_none());
}

#[tokio::test]
async fn oversized_body_is_rejected_without_storing() {
    let store: Arc<dyn RasterStore> = Arc::new(MemoryRasterStore::new());
    let mut config = Config::default();
    config.server.max_request_size_mb = 1;
    let app = build_router(AppState::new(store.clone(), config));

    let (uri, _) = signature_uri();
    let padding = "A".repeat(2 * 1024 * 1024);
    let body = json!({ "image": uri, "padding": padding }).to_string();

    let (status, body, _) = send(&app, post_json("/save_canvas", body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "PayloadTooLarge");

    assert!(store.load(&SlotKey::signature()).unwrap().is_none());
}

#[tokio::test]
async fn filesystem_slot_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn RasterStore> = Arc::new(FilesystemRasterStore::new(dir.path()).unwrap());
    let app = build_router(AppState::new(store, Config::default()));

    let first = Raster::from_rgba(&RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))).unwrap();
    let (second_uri, second) = signature_uri();

    for uri in [signet_capture::encode_raster(&first), second_uri] {
        let (status, _, _) = send(
            &app,
            post_json("/save_canvas", json!({ "image": uri }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        std::fs::read(dir.path().join("signature.png")).unwrap(),
        second.as_bytes()
    );
}
