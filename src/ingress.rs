//! Ingress endpoint — synchronous HTTP entry into the triage pipeline.
//!
//! `POST /email` feeds one already-extracted message through the same
//! pipeline the poller uses; it exists for testing and for decoupling
//! polling from processing.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;

use crate::pipeline::TriagePipeline;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TriagePipeline>,
}

/// Build the Axum router for the ingress endpoint.
pub fn ingress_routes(pipeline: Arc<TriagePipeline>) -> Router {
    Router::new()
        .route("/email", post(handle_email))
        .route("/health", get(health))
        .with_state(AppState { pipeline })
}

/// One already-extracted inbound message.
#[derive(Debug, Deserialize)]
pub struct EmailInput {
    pub from_email: String,
    pub subject: String,
    pub body: String,
}

async fn handle_email(
    State(state): State<AppState>,
    Json(email): Json<EmailInput>,
) -> impl IntoResponse {
    match state
        .pipeline
        .handle(&email.from_email, &email.subject, &email.body)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(serde_json::json!(result))),
        Err(e) => {
            error!(sender = %email.from_email, error = %e, "Pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inbox-triage",
    }))
}
