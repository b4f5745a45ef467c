//! Multi-turn booking dialog
//!
//! A fixed ordered script, per-session state behind a per-key lock, and
//! slot extraction dispatched by kind.

pub mod engine;
pub mod script;
pub mod session;
pub mod slots;

pub use engine::{DialogEngine, SLOW_REPLY};
pub use script::{Script, SlotKind, Step};
pub use session::{DialogSession, SessionStore, Speaker, TranscriptEntry};
pub use slots::{LlmSlotExtractor, SlotExtractor};
