//! HugDimon backend library
//!
//! Conversational backend for the HugDimon cat concierge of Cadaqués:
//! sentiment-tagged proverb replies, retrieval-augmented place context, and
//! a multi-turn restaurant booking dialog, served over a small axum API.

pub mod api;
pub mod cache;
pub mod chat;
pub mod clients;
pub mod config;
pub mod dialog;
pub mod error;
pub mod metrics;
pub mod resilience;
