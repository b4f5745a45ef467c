//! Dialog session engine
//!
//! Finite-state machine over the booking script. Each inbound message either
//! creates the session (and emits the first prompt), advances it by one step
//! when slot extraction succeeds, or re-emits the current prompt verbatim
//! when it does not. The terminal state is a fixed point: once the script is
//! complete, further messages keep returning the rendered confirmation.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::dialog::script::Script;
use crate::dialog::session::{DialogSession, SessionStore, Speaker};
use crate::dialog::slots::SlotExtractor;

/// Fixed reply when slot extraction misses its deadline. Session state is
/// left untouched so the same step is retried on the next message.
pub const SLOW_REPLY: &str =
    "Sorry, the restaurant booking system is taking too long to respond. Please try again later! 🐱";

const EXTRACTION_DEADLINE: Duration = Duration::from_secs(5);

pub struct DialogEngine {
    script: Script,
    sessions: Arc<SessionStore>,
    extractor: Arc<dyn SlotExtractor>,
    extraction_deadline: Duration,
}

impl DialogEngine {
    pub fn new(
        script: Script,
        sessions: Arc<SessionStore>,
        extractor: Arc<dyn SlotExtractor>,
    ) -> Self {
        Self {
            script,
            sessions,
            extractor,
            extraction_deadline: EXTRACTION_DEADLINE,
        }
    }

    pub fn with_extraction_deadline(mut self, deadline: Duration) -> Self {
        self.extraction_deadline = deadline;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Drive the session one message forward and return the engine's reply.
    pub async fn next_step(&self, session_id: &str, lang: &str, user_input: &str) -> String {
        let raw = user_input.trim().to_string();
        let (handle, created) = self.sessions.get_or_create(session_id, lang).await;
        let mut session = handle.lock().await;
        session.lang = lang.to_string();
        session.record(Speaker::User, raw.clone());

        if created {
            info!(session_id, lang, "booking dialog started");
            let reply = self.prompt_at(&session, 0, lang);
            session.record(Speaker::Bot, reply.clone());
            return reply;
        }

        if session.current_step >= self.script.len() {
            // Terminal fixed point: keep confirming, never advance or crash.
            let reply = self.confirmation(&session, lang);
            session.record(Speaker::Bot, reply.clone());
            return reply;
        }

        let step = self
            .script
            .step(session.current_step)
            .expect("step index bounded by script length");

        let reply = match step.expect {
            Some(kind) => {
                let extraction = timeout(
                    self.extraction_deadline,
                    self.extractor.extract(&raw, kind, lang),
                )
                .await;

                match extraction {
                    Err(_) => {
                        warn!(session_id, ?kind, "slot extraction deadline expired");
                        let reply = SLOW_REPLY.to_string();
                        session.record(Speaker::Bot, reply.clone());
                        return reply;
                    }
                    Ok(Ok(Some(value))) => {
                        info!(session_id, ?kind, value = %value, "slot extracted");
                        session.slots.insert(kind.slot_name().to_string(), value);
                        session.current_step += 1;
                        self.prompt_at(&session, session.current_step, lang)
                    }
                    // Unknown (or extractor-internal failure): re-ask verbatim.
                    Ok(Ok(None)) | Ok(Err(_)) => self.prompt_at(&session, session.current_step, lang),
                }
            }
            None => {
                session.slots.insert(step.id.clone(), raw);
                session.current_step += 1;
                self.prompt_at(&session, session.current_step, lang)
            }
        };

        session.record(Speaker::Bot, reply.clone());
        reply
    }

    /// Prompt for a step index; indices past the end render the confirmation.
    fn prompt_at(&self, session: &DialogSession, index: usize, lang: &str) -> String {
        match self.script.step(index) {
            Some(step) => step.render(lang, &session.slots),
            None => self.confirmation(session, lang),
        }
    }

    fn confirmation(&self, session: &DialogSession, lang: &str) -> String {
        self.script.last_step().render(lang, &session.slots)
    }
}
