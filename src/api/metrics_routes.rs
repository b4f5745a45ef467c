//! Metrics endpoint
//!
//! - GET /metrics - JSON snapshot of process counters and latency stats

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::Value;

use crate::metrics;

pub fn create_metrics_router() -> Router {
    Router::new().route("/metrics", get(handle_metrics))
}

async fn handle_metrics() -> Json<Value> {
    Json(metrics::snapshot())
}
