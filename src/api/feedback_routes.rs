//! Retrieval feedback endpoint
//!
//! - POST /feedback/rag - record whether retrieved places were helpful
//!
//! Feedback is logged and counted so retrieval quality can be inspected
//! from the logs; delivery is at-most-once and nothing is persisted.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::state::AppState;
use crate::error::ApiError;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct RagFeedbackRequest {
    pub query_id: Option<String>,
    pub is_helpful: Option<bool>,
    #[serde(default)]
    pub result_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RagFeedbackResponse {
    pub status: String,
}

pub fn create_feedback_router(state: AppState) -> Router {
    Router::new()
        .route("/feedback/rag", post(handle_rag_feedback))
        .with_state(state)
}

async fn handle_rag_feedback(
    State(_state): State<AppState>,
    payload: Result<Json<RagFeedbackRequest>, JsonRejection>,
) -> Result<Json<RagFeedbackResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query_id = req
        .query_id
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation("query_id", "query_id must be a non-empty string"))?;

    let is_helpful = req
        .is_helpful
        .ok_or_else(|| ApiError::validation("is_helpful", "is_helpful must be a boolean"))?;

    let results: Value = json!(req.result_ids);
    info!(query_id, is_helpful, results = %results, "rag feedback received");
    if is_helpful {
        metrics::incr("rag_feedback_helpful");
    } else {
        metrics::incr("rag_feedback_unhelpful");
    }

    Ok(Json(RagFeedbackResponse {
        status: "recorded".to_string(),
    }))
}
