//! External collaborator interfaces
//!
//! Each collaborator is a narrow trait the orchestration core consumes:
//! language detection, sentiment classification, completion generation,
//! translation and knowledge retrieval. Default implementations back onto
//! HTTP services via reqwest or onto small local heuristics; tests substitute
//! mocks at the same seams.

pub mod completion;
pub mod language;
pub mod retriever;
pub mod sentiment;
pub mod translator;

pub use completion::{CompletionClient, CompletionError, OpenAiClient};
pub use language::{Detection, HeuristicDetector, LanguageDetector};
pub use retriever::{HttpRetriever, Place, PlaceRetriever};
pub use sentiment::{LexiconClassifier, Sentiment, SentimentClassifier};
pub use translator::{HttpTranslator, IdentityTranslator, Translator};
