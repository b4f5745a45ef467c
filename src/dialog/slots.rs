//! Slot extraction from free-text dialog replies
//!
//! Each slot kind dispatches to its own extraction logic behind one uniform
//! trait. The default implementation asks the completion generator to pull
//! the value out of the reply, then validates the shape locally; anything
//! unclear comes back as `None` ("unknown") so the engine re-prompts.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::CompletionClient;
use crate::dialog::script::SlotKind;

#[async_trait]
pub trait SlotExtractor: Send + Sync {
    /// Extract the value for `kind` from a raw user reply. `Ok(None)` means
    /// the reply was unclear and the step should be re-asked.
    async fn extract(&self, reply: &str, kind: SlotKind, lang: &str) -> Result<Option<String>>;
}

/// LLM-backed extractor: one focused prompt per slot kind, with local shape
/// validation on the model's answer.
pub struct LlmSlotExtractor {
    completion: Arc<dyn CompletionClient>,
}

impl LlmSlotExtractor {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    fn prompt_for(kind: SlotKind, reply: &str) -> String {
        match kind {
            SlotKind::People => format!(
                "We are in a restaurant booking scenario.\n\n\
                 The assistant asked: \"How many people are you booking for?\"\n\n\
                 The user replied: \"{reply}\"\n\n\
                 Please extract the number of people as a plain number, like \"4\".\n\
                 If the number is unclear or missing, return \"unknown\".\n\
                 Only return the value, no extra explanation."
            ),
            SlotKind::Time => format!(
                "We are in a restaurant booking scenario.\n\n\
                 The assistant asked: \"What time would you like the reservation?\"\n\n\
                 The user replied: \"{reply}\"\n\n\
                 Please extract the time from the user's response, in a simple format \
                 like \"19:00\" or \"7pm\".\n\
                 If the time is unclear or missing, return \"unknown\".\n\
                 Only return the time value, no extra explanation."
            ),
        }
    }

    /// Validate the model's answer for the slot shape; relaxed by design.
    fn validate(kind: SlotKind, answer: &str) -> Option<String> {
        let answer = answer.trim();
        if answer.is_empty() || answer.eq_ignore_ascii_case("unknown") {
            return None;
        }
        match kind {
            SlotKind::People => {
                // Keep the leading integer only.
                let digits: String = answer
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                if digits.is_empty() {
                    None
                } else {
                    Some(digits)
                }
            }
            SlotKind::Time => {
                if answer.chars().any(|c| c.is_ascii_digit()) {
                    Some(answer.to_string())
                } else {
                    None
                }
            }
        }
    }
}

#[async_trait]
impl SlotExtractor for LlmSlotExtractor {
    async fn extract(&self, reply: &str, kind: SlotKind, lang: &str) -> Result<Option<String>> {
        let prompt = Self::prompt_for(kind, reply);
        let system = format!("You extract structured values from user replies. Language: {lang}.");

        match self.completion.generate(&system, &prompt).await {
            Ok(answer) => {
                let value = Self::validate(kind, &answer);
                debug!(?kind, answer = %answer, extracted = ?value, "slot extraction");
                Ok(value)
            }
            Err(e) => {
                // Extraction failures re-prompt rather than failing the session.
                warn!(?kind, error = %e, "slot extraction failed, treating as unknown");
                Ok(None)
            }
        }
    }
}
