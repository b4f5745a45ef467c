//! HTTP API for the HugDimon backend
//!
//! Route-per-file modules, each exposing a `create_*_router` constructor;
//! `create_app_router` merges them and applies the CORS and trace layers.

pub mod chat_routes;
pub mod feedback_routes;
pub mod guide_routes;
pub mod health_routes;
pub mod metrics_routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// The full application router with CORS and request tracing.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(chat_routes::create_chat_router(state.clone()))
        .merge(guide_routes::create_guide_router(state.clone()))
        .merge(feedback_routes::create_feedback_router(state.clone()))
        .merge(health_routes::create_health_router(state))
        .merge(metrics_routes::create_metrics_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
