//! Request orchestration pipeline
//!
//! One inbound message runs the whole flow: sanitation, concurrent language
//! and sentiment detection, booking-dialog hand-off, feature extraction,
//! cached-and-retried retrieval, ranking, completion, proverb selection and
//! translation, and final composition. Every external boundary is a
//! containment boundary: whatever fails, the pipeline answers something.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::cache::TtlCache;
use crate::chat::compose::{build_context_block, compose_reply, format_place_listing};
use crate::chat::features::{FeatureCatalog, RequiredFeatures};
use crate::chat::persona::PersonaStore;
use crate::chat::proverbs::ProverbPicker;
use crate::chat::ranking::{filter_by_features, rank};
use crate::chat::text::sanitize_input;
use crate::chat::triggers::TriggerDetector;
use crate::clients::{
    CompletionClient, CompletionError, Detection, LanguageDetector, Place, PlaceRetriever,
    SentimentClassifier, Translator,
};
use crate::config::{is_supported_lang, DEFAULT_LANG};
use crate::dialog::DialogEngine;
use crate::metrics;
use crate::resilience::{call_with_retry, RetryPolicy};

/// Cap on retrieval results entering ranking and composition.
const MAX_RESULTS: usize = 10;

/// Language-agnostic last-resort reply when anything unhandled goes wrong.
pub const FALLBACK_REPLY: &str =
    "Meow... Something went wrong with my whiskers. Try again later! 🐱";

/// Canned completion fallbacks, one per failure kind (translated on use).
const RATE_LIMIT_REPLY: &str = "I'm taking a cat nap. Please try again later.";
const TIMEOUT_REPLY: &str = "The internet mouse is too slow right now.";
const API_ERROR_REPLY: &str = "I'm having trouble connecting to my brain. Please try again later.";
const GENERIC_ERROR_REPLY: &str = "I cannot respond at this moment. 🐾";

pub struct ChatPipeline {
    detector: Arc<dyn LanguageDetector>,
    sentiment: Arc<dyn SentimentClassifier>,
    retriever: Arc<dyn PlaceRetriever>,
    completion: Arc<dyn CompletionClient>,
    translator: Arc<dyn Translator>,
    dialog: Arc<DialogEngine>,
    features: FeatureCatalog,
    triggers: TriggerDetector,
    personas: PersonaStore,
    proverbs: ProverbPicker,
    retrieval_cache: TtlCache<Vec<Place>>,
    completion_cache: TtlCache<String>,
    translation_cache: TtlCache<String>,
    retriever_policy: RetryPolicy,
    translator_policy: RetryPolicy,
}

#[allow(clippy::too_many_arguments)]
impl ChatPipeline {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        sentiment: Arc<dyn SentimentClassifier>,
        retriever: Arc<dyn PlaceRetriever>,
        completion: Arc<dyn CompletionClient>,
        translator: Arc<dyn Translator>,
        dialog: Arc<DialogEngine>,
        features: FeatureCatalog,
        triggers: TriggerDetector,
        personas: PersonaStore,
        proverbs: ProverbPicker,
    ) -> Self {
        Self {
            detector,
            sentiment,
            retriever,
            completion,
            translator,
            dialog,
            features,
            triggers,
            personas,
            proverbs,
            retrieval_cache: TtlCache::new(200, Duration::from_secs(1800)),
            completion_cache: TtlCache::new(1000, Duration::from_secs(3600)),
            translation_cache: TtlCache::new(500, Duration::from_secs(86_400)),
            retriever_policy: RetryPolicy::retriever(),
            translator_policy: RetryPolicy::translator(),
        }
    }

    /// Override the retry policies (shorter deadlines in tests).
    pub fn with_policies(mut self, retriever: RetryPolicy, translator: RetryPolicy) -> Self {
        self.retriever_policy = retriever;
        self.translator_policy = translator;
        self
    }

    /// Process one user message into a reply. Never fails: any unhandled
    /// error collapses into the fixed fallback apology.
    pub async fn process(
        &self,
        user_input: &str,
        session_id: &str,
        language_hint: Option<&str>,
    ) -> String {
        let started = Instant::now();
        let text = sanitize_input(user_input);

        let reply = match self.run(&text, session_id, language_hint).await {
            Ok(reply) => reply,
            Err(e) => {
                metrics::incr("chat_pipeline_errors");
                error!(session_id, error = %e, "chat pipeline failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        metrics::observe_latency("chat_request", started.elapsed());
        reply
    }

    async fn run(
        &self,
        text: &str,
        session_id: &str,
        language_hint: Option<&str>,
    ) -> anyhow::Result<String> {
        // Sentiment and language detection run concurrently; detection is
        // skipped entirely when the caller supplied a language.
        let (sentiment, lang) = match language_hint {
            Some(hint) => {
                info!(session_id, lang = hint, "using caller-supplied language");
                (self.sentiment.classify(text).await, hint.to_string())
            }
            None => {
                let (sentiment, detection) =
                    tokio::join!(self.sentiment.classify(text), self.detector.detect(text));
                let lang = self.resolve_language(detection, session_id).await;
                (sentiment, lang)
            }
        };

        let lang = if is_supported_lang(&lang) {
            lang
        } else {
            warn!(lang = %lang, "unsupported language, falling back to {DEFAULT_LANG}");
            DEFAULT_LANG.to_string()
        };

        // An existing booking session keeps the conversation in the dialog
        // engine; otherwise only an unambiguous trigger keyword starts one.
        let in_dialog = self.dialog.sessions().get(session_id).await.is_some();
        if in_dialog || self.triggers.is_restaurant_trigger(text, &lang) {
            info!(session_id, lang = %lang, in_dialog, "delegating to booking dialog");
            metrics::incr("restaurant_dialog_handoffs");
            return Ok(self.dialog.next_step(session_id, &lang, text).await);
        }

        let required = self.features.extract(text, &lang);
        let places = self.retrieve_places(text, &required).await;
        let ranked = rank(places);

        let context = build_context_block(&ranked, &required);
        let generated = self.generate_reply(text, &lang, &context).await;

        let (catalan, english) = self.proverbs.pick(sentiment);

        // The proverb pair already covers the default and native languages.
        let translated = if lang != DEFAULT_LANG && lang != "ca" {
            self.translate_cached(&english, &lang).await
        } else {
            english.clone()
        };

        Ok(compose_reply(&generated, &catalan, &english, &translated, &lang))
    }

    /// Guide flow: place listing straight from the retriever, no completion.
    pub async fn guide(&self, user_input: &str) -> String {
        let text = sanitize_input(user_input);
        let lang = match self.detector.detect(&text).await {
            Detection::Tag(tag) if is_supported_lang(&tag) => tag,
            _ => DEFAULT_LANG.to_string(),
        };
        let required = self.features.extract(&text, &lang);
        let places = self.retrieve_places(&text, &required).await;
        format_place_listing(&places)
    }

    /// Map indeterminate detection (numeric-only input) onto the session's
    /// previous language, falling back to the default.
    async fn resolve_language(&self, detection: Detection, session_id: &str) -> String {
        match detection {
            Detection::Tag(tag) => tag,
            Detection::Indeterminate => {
                let carried = self.dialog.sessions().language_of(session_id).await;
                let lang = carried.unwrap_or_else(|| DEFAULT_LANG.to_string());
                info!(session_id, lang = %lang, "indeterminate detection, carrying previous language");
                lang
            }
        }
    }

    /// Retrieval with cache and retry; failures degrade to no context.
    async fn retrieve_places(&self, text: &str, required: &RequiredFeatures) -> Vec<Place> {
        let cache_key = format!("{text}:{}", required.cache_key());
        if let Some(cached) = self.retrieval_cache.get(&cache_key) {
            metrics::cache_hit("retrieval");
            return cached;
        }
        metrics::cache_miss("retrieval");

        let outcome = call_with_retry("retrieval", &self.retriever_policy, Vec::new, || {
            self.retriever.query(text, MAX_RESULTS)
        })
        .await;

        let fallback_used = outcome.used_fallback();
        let mut places = filter_by_features(outcome.into_inner(), required);
        places.truncate(MAX_RESULTS);
        metrics::incr_by("retrieval_results", places.len() as u64);

        if !fallback_used {
            self.retrieval_cache.put(cache_key, places.clone());
        }
        places
    }

    /// Completion with cache; each failure kind maps to its own canned
    /// reply, translated to the detected language.
    async fn generate_reply(&self, text: &str, lang: &str, context: &str) -> String {
        let cache_key = format!("{text}:{lang}");
        if let Some(cached) = self.completion_cache.get(&cache_key) {
            metrics::cache_hit("completion");
            return cached;
        }
        metrics::cache_miss("completion");

        let persona = self.personas.for_request(lang, text);
        let system_prompt = format!("{}\n\n{}", context.trim(), persona.trim());

        let started = Instant::now();
        match self.completion.generate(&system_prompt, text).await {
            Ok(reply) => {
                metrics::observe_latency("completion", started.elapsed());
                self.completion_cache.put(cache_key, reply.clone());
                reply
            }
            Err(e) => {
                metrics::observe_latency("completion", started.elapsed());
                warn!(error = %e, "completion failed, using canned reply");
                let canned = match e {
                    CompletionError::RateLimited => {
                        metrics::incr("completion_rate_limit_errors");
                        RATE_LIMIT_REPLY
                    }
                    CompletionError::Timeout => {
                        metrics::timeout("completion");
                        TIMEOUT_REPLY
                    }
                    CompletionError::Api(_) => {
                        metrics::incr("completion_api_errors");
                        API_ERROR_REPLY
                    }
                    CompletionError::Other(_) => {
                        metrics::incr("completion_unexpected_errors");
                        GENERIC_ERROR_REPLY
                    }
                };
                self.translate_cached(canned, lang).await
            }
        }
    }

    /// Translation with cache and retry; failure degrades to the source text.
    async fn translate_cached(&self, text: &str, target_lang: &str) -> String {
        if target_lang == DEFAULT_LANG || text.is_empty() {
            return text.to_string();
        }

        let cache_key = format!("{text}:{target_lang}");
        if let Some(cached) = self.translation_cache.get(&cache_key) {
            metrics::cache_hit("translation");
            return cached;
        }
        metrics::cache_miss("translation");

        let source = text.to_string();
        let outcome = call_with_retry(
            "translation",
            &self.translator_policy,
            || source.clone(),
            || self.translator.translate(text, target_lang),
        )
        .await;

        let fallback_used = outcome.used_fallback();
        let translated = outcome.into_inner();
        if !fallback_used {
            self.translation_cache.put(cache_key, translated.clone());
        }
        translated
    }
}
