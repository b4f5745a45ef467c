//! Health and welcome endpoints
//!
//! - GET /        - welcome banner
//! - GET /health  - liveness probe with session count

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::api::state::AppState;

pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .with_state(state)
}

async fn handle_index() -> Json<Value> {
    Json(json!({
        "service": "hugdimon",
        "message": "Meow! HugDimon the Cadaqués cat concierge is listening. 🐱",
    }))
}

async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "active_sessions": state.sessions.len().await,
    }))
}
