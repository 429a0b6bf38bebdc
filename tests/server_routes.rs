use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageFormat, Rgb, RgbImage};
use layout_analyzer::server::build_router;
use layout_analyzer::settings::Settings;
use serde_json::{Value, json};
use std::io::Cursor;
use tower::ServiceExt;

async fn post_analyze(body: Value) -> (StatusCode, Value) {
    let app = build_router(Settings::default());
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(Settings::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn analyze_returns_element_array() {
    let mut image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
    for y in 45..55 {
        for x in 40..60 {
            image.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    let encoded = BASE64.encode(buffer.into_inner());

    let (status, body) = post_analyze(json!({ "image_base64": encoded })).await;
    assert_eq!(status, StatusCode::OK);
    let elements = body.as_array().expect("array");
    assert_eq!(elements[0]["type"], "texto_principal");
    assert_eq!(elements[0]["position"], "centro");
}

#[tokio::test]
async fn undecodable_image_is_unprocessable() {
    let (status, body) = post_analyze(json!({ "image_base64": "!!!" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_field_is_bad_request() {
    let (status, body) = post_analyze(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "image_base64 is required");
}
