//! Shared application state handed to every route handler.

use std::sync::Arc;

use crate::chat::ChatPipeline;
use crate::dialog::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<ChatPipeline>, sessions: Arc<SessionStore>) -> Self {
        Self { pipeline, sessions }
    }
}
