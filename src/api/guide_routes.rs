//! Guide endpoint
//!
//! - POST /guide - plain place listing from the retriever, no generation

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::error::ApiError;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub response: String,
}

pub fn create_guide_router(state: AppState) -> Router {
    Router::new()
        .route("/guide", post(handle_guide))
        .with_state(state)
}

async fn handle_guide(
    State(state): State<AppState>,
    payload: Result<Json<GuideRequest>, JsonRejection>,
) -> Result<Json<GuideResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::validation("message", "message must be a non-empty string"))?;

    info!(chars = message.len(), "guide request received");
    metrics::incr("guide_requests");

    let response = state.pipeline.guide(message).await;
    Ok(Json(GuideResponse { response }))
}
