//! Dialog sessions and the per-key-locked session store
//!
//! A session tracks one user's progress through the booking script: current
//! step index, extracted slots, and an append-only transcript. The store
//! serializes all operations on the same session id behind a per-key mutex so
//! the step-advance invariant holds under concurrent messages. Sessions live
//! for the process lifetime; eviction is an external policy.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Per-session dialog state. Mutated only while holding the session's mutex.
#[derive(Debug, Clone)]
pub struct DialogSession {
    pub current_step: usize,
    pub slots: HashMap<String, String>,
    pub transcript: Vec<TranscriptEntry>,
    pub lang: String,
    pub updated_at: DateTime<Utc>,
}

impl DialogSession {
    pub fn new(lang: &str) -> Self {
        Self {
            current_step: 0,
            slots: HashMap::new(),
            transcript: Vec::new(),
            lang: lang.to_string(),
            updated_at: Utc::now(),
        }
    }

    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            speaker,
            text: text.into(),
        });
        self.updated_at = Utc::now();
    }
}

type SessionHandle = Arc<Mutex<DialogSession>>;

/// Shared session store keyed by opaque session id.
///
/// The outer `RwLock` guards only the map; each session has its own `Mutex`
/// so long-running work on one session never blocks others.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for `id`, creating it at step 0 when absent.
    /// Returns the handle and whether it was just created.
    pub async fn get_or_create(&self, id: &str, lang: &str) -> (SessionHandle, bool) {
        {
            let map = self.inner.read().await;
            if let Some(handle) = map.get(id) {
                return (handle.clone(), false);
            }
        }

        let mut map = self.inner.write().await;
        // Double-checked: another task may have created it meanwhile.
        if let Some(handle) = map.get(id) {
            return (handle.clone(), false);
        }
        let handle = Arc::new(Mutex::new(DialogSession::new(lang)));
        map.insert(id.to_string(), handle.clone());
        (handle, true)
    }

    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner.read().await.get(id).cloned()
    }

    /// Last known language for a session, used when detection is
    /// indeterminate on a later message.
    pub async fn language_of(&self, id: &str) -> Option<String> {
        let handle = self.get(id).await?;
        let session = handle.lock().await;
        Some(session.lang.clone())
    }

    pub async fn transcript_of(&self, id: &str) -> Option<Vec<TranscriptEntry>> {
        let handle = self.get(id).await?;
        let session = handle.lock().await;
        Some(session.transcript.clone())
    }

    /// Reset a session back to step 0, keeping its identity.
    pub async fn reset(&self, id: &str) -> bool {
        match self.get(id).await {
            Some(handle) => {
                let mut session = handle.lock().await;
                let lang = session.lang.clone();
                *session = DialogSession::new(&lang);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_reuse() {
        let store = SessionStore::new();
        let (_, created) = store.get_or_create("s1", "en").await;
        assert!(created);
        let (_, created) = store.get_or_create("s1", "fr").await;
        assert!(!created);
        assert_eq!(store.language_of("s1").await.as_deref(), Some("en"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_reset_preserves_language() {
        let store = SessionStore::new();
        let (handle, _) = store.get_or_create("s1", "ca").await;
        {
            let mut session = handle.lock().await;
            session.current_step = 2;
            session.slots.insert("people".into(), "4".into());
        }
        assert!(store.reset("s1").await);
        let session = handle.lock().await;
        assert_eq!(session.current_step, 0);
        assert!(session.slots.is_empty());
        assert_eq!(session.lang, "ca");
    }

    #[tokio::test]
    async fn test_same_session_operations_serialize() {
        let store = Arc::new(SessionStore::new());
        let (handle, _) = store.get_or_create("s1", "en").await;

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                let mut session = handle.lock().await;
                // Read-then-write under the lock.
                let step = session.current_step;
                tokio::task::yield_now().await;
                session.current_step = step + 1;
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(handle.lock().await.current_step, 10);
    }
}
