//! Conversational reply pipeline: sanitation, feature extraction, ranking,
//! composition, proverbs, personas, and the orchestrator that ties them to
//! the external collaborators.

pub mod compose;
pub mod features;
pub mod orchestrator;
pub mod persona;
pub mod proverbs;
pub mod ranking;
pub mod text;
pub mod triggers;

pub use features::{FeatureCatalog, RequiredFeatures};
pub use orchestrator::{ChatPipeline, FALLBACK_REPLY};
pub use persona::PersonaStore;
pub use proverbs::{Proverb, ProverbBook, ProverbPicker};
pub use ranking::RankedPlace;
pub use triggers::TriggerDetector;
