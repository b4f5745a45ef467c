//! Chat endpoint
//!
//! - POST /chat - run one user message through the reply pipeline
//!
//! Input validation happens here, before any collaborator is touched: an
//! absent or blank message is rejected with a structured 400 and the
//! pipeline never runs.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use uuid::Uuid;

use crate::api::state::AppState;
use crate::error::ApiError;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub detected_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

pub fn create_chat_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handle_chat))
        .with_state(state)
}

async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::validation("message", "message must be a non-empty string"))?;

    // The hint is passed through as-is; the pipeline silently falls back to
    // the default language when it is unsupported.
    let language_hint = req.detected_language.as_deref();

    // A fresh id is minted when the client did not send one; it comes back
    // in the response so the client can continue the conversation.
    let session_id = req
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(session_id = %session_id, chars = message.len(), "chat request received");
    metrics::incr("chat_requests");

    let response = state
        .pipeline
        .process(message, &session_id, language_hint)
        .await;

    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}
