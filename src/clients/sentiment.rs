//! Sentiment classification collaborator
//!
//! Classifies user text into Positive / Negative / Neutral, driving proverb
//! selection. The default implementation is a small polarity lexicon; a
//! misbehaving classifier degrades to Neutral rather than failing the
//! pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Sentiment;
}

const POSITIVE_WORDS: [&str; 18] = [
    "good", "great", "love", "lovely", "wonderful", "amazing", "beautiful", "best", "happy",
    "nice", "perfect", "excellent", "fantastic", "enjoy", "delicious", "thanks", "thank",
    "awesome",
];

const NEGATIVE_WORDS: [&str; 16] = [
    "bad", "terrible", "hate", "awful", "horrible", "worst", "sad", "angry", "disappointed",
    "disgusting", "broken", "slow", "dirty", "rude", "never", "problem",
];

/// Polarity-lexicon classifier: positive hits minus negative hits.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| !t.is_empty())
            .collect();

        let positive = tokens.iter().filter(|t| POSITIVE_WORDS.contains(t)).count() as i64;
        let negative = tokens.iter().filter(|t| NEGATIVE_WORDS.contains(t)).count() as i64;

        match positive - negative {
            p if p > 0 => Sentiment::Positive,
            n if n < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_polarity_buckets() {
        let c = LexiconClassifier;
        assert_eq!(
            c.classify("What a wonderful, beautiful day!").await,
            Sentiment::Positive
        );
        assert_eq!(
            c.classify("This is terrible, I hate it").await,
            Sentiment::Negative
        );
        assert_eq!(
            c.classify("Where is the train station?").await,
            Sentiment::Neutral
        );
    }

    #[tokio::test]
    async fn test_mixed_text_balances_out() {
        let c = LexiconClassifier;
        assert_eq!(
            c.classify("good food but terrible service").await,
            Sentiment::Neutral
        );
    }
}
