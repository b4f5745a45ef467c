//! Language detection collaborator
//!
//! The orchestrator only needs a language tag or an "indeterminate" signal
//! (numeric-only input, where the previous session language should carry
//! forward). The default implementation is a local heuristic: script ranges
//! and small function-word lists per supported language.

use async_trait::async_trait;
use tracing::debug;

use crate::config::DEFAULT_LANG;

/// Outcome of language detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// ISO 639-1 tag, e.g. "en", "ca".
    Tag(String),
    /// Input carries no language signal (numeric-only); the caller should
    /// reuse the previous language for the session.
    Indeterminate,
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Detection;
}

/// Short colloquial Russian words that langdetect-style scoring misses;
/// their presence forces a Russian tag.
const RUSSIAN_EXCEPTION_WORDS: [&str; 11] = [
    "привет", "ну", "че", "чо", "емое", "ёмое", "йо", "норм", "лол", "ок", "понял",
];

/// Function words per language, used for a simple overlap score.
const FUNCTION_WORDS: [(&str, &[&str]); 6] = [
    (
        "en",
        &[
            "the", "and", "is", "are", "you", "for", "with", "what", "how", "where", "many",
            "people", "a", "i", "to",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "es", "que", "para", "con", "una", "donde", "como", "cuantos",
            "quiero", "por",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "est", "que", "pour", "avec", "une", "où", "comment", "combien",
            "je", "vous",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "ist", "und", "für", "mit", "eine", "wo", "wie", "viele", "ich",
            "sie",
        ],
    ),
    (
        "ca",
        &[
            "el", "la", "els", "és", "que", "per", "amb", "una", "on", "com", "quantes", "vull",
            "les", "hi",
        ],
    ),
    (
        "ru",
        &[
            "в", "и", "не", "на", "что", "как", "где", "сколько", "это", "я", "вы", "для", "хочу",
        ],
    ),
];

/// Local heuristic detector: exception words, script ranges, then
/// function-word overlap. Falls back to the default language.
#[derive(Debug, Clone, Default)]
pub struct HeuristicDetector;

#[async_trait]
impl LanguageDetector for HeuristicDetector {
    async fn detect(&self, text: &str) -> Detection {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Detection::Tag(DEFAULT_LANG.to_string());
        }

        // Numeric-only input carries no language signal.
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            debug!("numeric-only input, language indeterminate");
            return Detection::Indeterminate;
        }

        let lowered = trimmed.to_lowercase();
        if RUSSIAN_EXCEPTION_WORDS
            .iter()
            .any(|w| lowered.split_whitespace().any(|t| t.trim_matches(|c: char| !c.is_alphabetic()) == *w))
        {
            return Detection::Tag("ru".to_string());
        }

        if lowered.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c)) {
            return Detection::Tag("ru".to_string());
        }

        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| !t.is_empty())
            .collect();

        let mut best = (DEFAULT_LANG, 0usize);
        for (lang, words) in FUNCTION_WORDS {
            let score = tokens.iter().filter(|t| words.contains(t)).count();
            if score > best.1 {
                best = (lang, score);
            }
        }

        debug!(lang = best.0, score = best.1, "heuristic language detection");
        Detection::Tag(best.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_numeric_only_is_indeterminate() {
        let d = HeuristicDetector;
        assert_eq!(d.detect("42").await, Detection::Indeterminate);
        assert_eq!(d.detect("  1234 ").await, Detection::Indeterminate);
    }

    #[tokio::test]
    async fn test_exception_words_force_russian() {
        let d = HeuristicDetector;
        assert_eq!(d.detect("Привет!").await, Detection::Tag("ru".into()));
        assert_eq!(d.detect("ну ладно").await, Detection::Tag("ru".into()));
    }

    #[tokio::test]
    async fn test_cyrillic_is_russian() {
        let d = HeuristicDetector;
        assert_eq!(
            d.detect("Сколько стоит ужин?").await,
            Detection::Tag("ru".into())
        );
    }

    #[tokio::test]
    async fn test_common_languages() {
        let d = HeuristicDetector;
        assert_eq!(
            d.detect("Where is the best restaurant for many people?").await,
            Detection::Tag("en".into())
        );
        assert_eq!(
            d.detect("Où est la terrasse avec une vue?").await,
            Detection::Tag("fr".into())
        );
    }

    #[tokio::test]
    async fn test_empty_input_defaults() {
        let d = HeuristicDetector;
        assert_eq!(d.detect("   ").await, Detection::Tag("en".into()));
    }
}
