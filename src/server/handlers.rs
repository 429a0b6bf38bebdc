use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::element::Element;
use crate::output::ErrorResponse;
use crate::settings;

use super::analyze::analyze_request;
use super::models::AnalyzeRequest;
use super::state::ServerState;

pub fn build_router(settings: settings::Settings) -> Router {
    let state = Arc::new(ServerState { settings });
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

pub async fn run_server(settings: settings::Settings, addr: String) -> Result<()> {
    let app = build_router(settings);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address: {}", addr))?;
    info!(%addr, "layout analyzer listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
}

async fn analyze(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<Vec<Element>>, (StatusCode, Json<ErrorResponse>)> {
    let result = tokio::task::spawn_blocking(move || analyze_request(state.as_ref(), payload))
        .await
        .map_err(|err| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("analysis task failed: {}", err),
                }),
            )
        })?;

    match result {
        Ok(elements) => Ok(Json(elements)),
        Err(err) => Err((err.status, Json(ErrorResponse { error: err.message }))),
    }
}
