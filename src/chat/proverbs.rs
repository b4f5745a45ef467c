//! Sentiment-tagged Catalan proverbs
//!
//! Loads the proverb book from YAML and selects one per reply, matching the
//! detected sentiment while avoiding the proverbs used in the last 50
//! selections for that sentiment. When the whole pool for a sentiment has
//! been used recently, the exclusion resets for that call only; history for
//! other sentiments is untouched.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clients::Sentiment;
use crate::config::ConfigError;

const RECENT_WINDOW: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proverb {
    pub id: u32,
    pub catalan: String,
    pub english: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProverbBook {
    #[serde(default)]
    pub proverbs: Vec<Proverb>,
}

impl ProverbBook {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let book = Self::load_from_str(&content)?;
        info!(path = %path.display(), count = book.proverbs.len(), "loaded proverb book");
        Ok(book)
    }

    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Fallback used when the book is empty or unloadable.
const DEFAULT_PROVERB: (&str, &str) = (
    "Fes bé i no facis mal, que altre sermó no et cal.",
    "Do good and do no harm, for you need no other sermon.",
);

/// Proverb selector with a bounded recent-use history.
pub struct ProverbPicker {
    book: ProverbBook,
    recent: Mutex<VecDeque<(u32, Sentiment)>>,
}

impl ProverbPicker {
    pub fn new(book: ProverbBook) -> Self {
        Self {
            book,
            recent: Mutex::new(VecDeque::with_capacity(RECENT_WINDOW)),
        }
    }

    /// Pick a proverb for `sentiment`, preferring ones not used in the last
    /// 50 selections for that sentiment. Returns (catalan, english).
    pub fn pick(&self, sentiment: Sentiment) -> (String, String) {
        let pool: Vec<&Proverb> = {
            let matching: Vec<&Proverb> = self
                .book
                .proverbs
                .iter()
                .filter(|p| p.sentiment == sentiment)
                .collect();
            if matching.is_empty() {
                warn!(sentiment = sentiment.as_str(), "no proverbs for sentiment, using whole book");
                self.book.proverbs.iter().collect()
            } else {
                matching
            }
        };

        if pool.is_empty() {
            return (DEFAULT_PROVERB.0.to_string(), DEFAULT_PROVERB.1.to_string());
        }

        let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        let recent_ids: Vec<u32> = recent
            .iter()
            .filter(|(_, s)| *s == sentiment)
            .map(|(id, _)| *id)
            .collect();

        let fresh: Vec<&&Proverb> = pool
            .iter()
            .filter(|p| !recent_ids.contains(&p.id))
            .collect();

        let mut rng = rand::thread_rng();
        let chosen: &Proverb = if fresh.is_empty() {
            // Whole pool exhausted: reset the exclusion for this call only.
            debug!(
                sentiment = sentiment.as_str(),
                "proverb pool exhausted, resetting exclusion for this selection"
            );
            pool.choose(&mut rng).copied().unwrap_or(pool[0])
        } else {
            fresh.choose(&mut rng).copied().copied().unwrap_or(pool[0])
        };

        if recent.len() >= RECENT_WINDOW {
            recent.pop_front();
        }
        recent.push_back((chosen.id, sentiment));

        debug!(id = chosen.id, sentiment = sentiment.as_str(), "selected proverb");
        (chosen.catalan.clone(), chosen.english.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(n_positive: u32, n_negative: u32) -> ProverbBook {
        let mut proverbs = Vec::new();
        for i in 0..n_positive {
            proverbs.push(Proverb {
                id: i,
                catalan: format!("pos-ca-{i}"),
                english: format!("pos-en-{i}"),
                sentiment: Sentiment::Positive,
            });
        }
        for i in 0..n_negative {
            proverbs.push(Proverb {
                id: 1000 + i,
                catalan: format!("neg-ca-{i}"),
                english: format!("neg-en-{i}"),
                sentiment: Sentiment::Negative,
            });
        }
        ProverbBook { proverbs }
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
proverbs:
  - id: 1
    catalan: "Qui no arrisca, no pisca."
    english: "Who doesn't take risks, doesn't gain."
    sentiment: Positive
"#;
        let book = ProverbBook::load_from_str(yaml).unwrap();
        assert_eq!(book.proverbs.len(), 1);
        assert_eq!(book.proverbs[0].sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_avoids_repeats_until_pool_exhausted() {
        let picker = ProverbPicker::new(book(3, 0));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..3 {
            let (ca, _) = picker.pick(Sentiment::Positive);
            assert!(seen.insert(ca), "repeated a proverb before pool exhaustion");
        }
        // Fourth pick must still succeed (exclusion resets for the call).
        let (ca, _) = picker.pick(Sentiment::Positive);
        assert!(seen.contains(&ca));
    }

    #[test]
    fn test_exhaustion_does_not_reset_other_sentiments() {
        let picker = ProverbPicker::new(book(1, 2));
        // Exhaust the positive pool.
        picker.pick(Sentiment::Positive);
        picker.pick(Sentiment::Positive);

        // Negative history is independent: two picks must differ.
        let (first, _) = picker.pick(Sentiment::Negative);
        let (second, _) = picker.pick(Sentiment::Negative);
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_sentiment_falls_back_to_whole_book() {
        let picker = ProverbPicker::new(book(2, 0));
        let (ca, _) = picker.pick(Sentiment::Negative);
        assert!(ca.starts_with("pos-ca-"));
    }

    #[test]
    fn test_empty_book_uses_default() {
        let picker = ProverbPicker::new(ProverbBook::default());
        let (ca, en) = picker.pick(Sentiment::Neutral);
        assert_eq!(ca, DEFAULT_PROVERB.0);
        assert_eq!(en, DEFAULT_PROVERB.1);
    }
}
