//! The webhook and health/readiness HTTP surface.

pub mod error;
pub mod signature;
pub mod state;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use error::WebhookError;
pub use state::AppState;

use crate::document::ReviewDocument;
use crate::extract::{ExtractError, WebhookPayload};
use crate::pipeline::PipelineError;

const SIGNATURE_HEADER: &str = "x-webhook-signature";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/webhook", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[tracing::instrument]
async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
async fn ready_handler(State(state): State<AppState>) -> Response {
    if state.pipeline.store_is_ready().await {
        (StatusCode::OK, Json(HealthResponse { status: "ready" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "store_unreachable",
            }),
        )
            .into_response()
    }
}

#[tracing::instrument(skip(state, headers, body))]
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Response, WebhookError> {
    if let Some(secret) = state.webhook_signing_secret.as_deref() {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !signature::verify(secret, &body, provided) {
            return Err(WebhookError::SignatureMismatch);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        WebhookError::Pipeline(PipelineError::Extract(ExtractError::MalformedPayload(
            e.to_string(),
        )))
    })?;

    let document = state.pipeline.process(&payload).await?;
    Ok((StatusCode::OK, Json(webhook_response(&document))).into_response())
}

/// Compact `{status, review_id}` / `{status, reason}` body the webhook
/// response actually carries — never the full internal document.
fn webhook_response(document: &ReviewDocument) -> serde_json::Value {
    match document.reason() {
        Some(reason) => serde_json::json!({ "status": document.status(), "reason": reason }),
        None => serde_json::json!({ "status": document.status(), "review_id": document.id() }),
    }
}
