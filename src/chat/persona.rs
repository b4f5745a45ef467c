//! Persona document loading
//!
//! The completion generator is primed with a per-language persona document
//! from the prompts directory. Unsupported languages and missing files fall
//! back to the English document; a missing prompts directory falls back to a
//! built-in minimal persona so the pipeline stays available.

use std::path::PathBuf;

use tracing::warn;

use crate::chat::text::contains_any_keyword;
use crate::config::{is_supported_lang, DEFAULT_LANG};

const FALLBACK_PERSONA: &str =
    "ACT AS A MYSTICAL CAT FROM CADAQUÉS. SPEAK IN POETRY AND RIDDLES. LANGUAGE: ENGLISH.";

/// Keywords that flag a fact-based query; these get a practical-tone
/// instruction appended to the persona.
const FACTUAL_KEYWORDS: [&str; 6] = [
    "address",
    "how to get",
    "book",
    "reservation",
    "email",
    "phone",
];

const PRACTICAL_TONE: &str =
    "\n\nRemember: be practical and informative when answering factual questions.";

#[derive(Debug, Clone)]
pub struct PersonaStore {
    prompts_dir: PathBuf,
}

impl PersonaStore {
    pub fn new(prompts_dir: PathBuf) -> Self {
        Self { prompts_dir }
    }

    /// Load the persona for `lang`, with the `{{lang}}` placeholder resolved.
    pub fn load(&self, lang: &str) -> String {
        let lang = if is_supported_lang(lang) { lang } else { DEFAULT_LANG };

        let path = self.prompts_dir.join(format!("{lang}.md"));
        let fallback = self.prompts_dir.join(format!("{DEFAULT_LANG}.md"));

        let content = std::fs::read_to_string(&path).or_else(|_| {
            warn!(lang, "persona file missing, falling back to default language");
            std::fs::read_to_string(&fallback)
        });

        match content {
            Ok(text) => text.replace("{{lang}}", lang),
            Err(e) => {
                warn!(error = %e, "no persona files available, using builtin fallback");
                FALLBACK_PERSONA.to_string()
            }
        }
    }

    /// Persona for a request: base document plus the practical-tone addendum
    /// when the user text looks fact-seeking.
    pub fn for_request(&self, lang: &str, user_text: &str) -> String {
        let mut persona = self.load(lang);
        if contains_any_keyword(user_text, &FACTUAL_KEYWORDS) {
            persona.push_str(PRACTICAL_TONE);
        }
        persona
    }
}
