//! HugDimon REST API Server
//!
//! This binary wires the collaborator clients, loads the keyword tables and
//! proverb book, and serves the chat API.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! OPENAI_API_KEY=sk-... RETRIEVER_URL=http://localhost:8100 \
//!   cargo run --bin hugdimon_server
//!
//! # Test endpoints
//! curl -X POST http://localhost:5000/chat \
//!   -H "Content-Type: application/json" \
//!   -d '{"message": "Where can I eat with a sea view?"}'
//!
//! curl http://localhost:5000/health
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hugdimon::api::{create_app_router, AppState};
use hugdimon::chat::{ChatPipeline, FeatureCatalog, PersonaStore, ProverbBook, ProverbPicker, TriggerDetector};
use hugdimon::clients::{
    CompletionClient, HeuristicDetector, HttpRetriever, HttpTranslator, IdentityTranslator,
    LexiconClassifier, OpenAiClient, PlaceRetriever, Translator,
};
use hugdimon::config::{FeatureKeywords, RestaurantKeywords, Settings};
use hugdimon::dialog::{DialogEngine, LlmSlotExtractor, Script, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env();
    info!(port = settings.port, "starting hugdimon server");

    let restaurant_keywords =
        RestaurantKeywords::load_from_file(&settings.config_dir.join("restaurant_keywords.yaml"))?;
    let feature_keywords =
        FeatureKeywords::load_from_file(&settings.config_dir.join("feature_keywords.yaml"))?;
    let proverbs = ProverbBook::load_from_file(&settings.config_dir.join("proverbs.yaml"))?;

    let completion: Arc<dyn CompletionClient> = match settings.openai_api_key.clone() {
        Some(api_key) => Arc::new(OpenAiClient::new(
            api_key,
            settings.openai_base_url.clone(),
            settings.openai_model.clone(),
        )?),
        None => anyhow::bail!("OPENAI_API_KEY is required"),
    };

    let retriever: Arc<dyn PlaceRetriever> = match settings.retriever_url.clone() {
        Some(url) => Arc::new(HttpRetriever::new(url)?),
        None => anyhow::bail!("RETRIEVER_URL is required"),
    };

    let translator: Arc<dyn Translator> = match settings.translator_url.clone() {
        Some(url) => Arc::new(HttpTranslator::new(url)?),
        None => {
            warn!("TRANSLATOR_URL not set, proverb translations stay in English");
            Arc::new(IdentityTranslator)
        }
    };

    let sessions = Arc::new(SessionStore::new());
    let dialog = Arc::new(DialogEngine::new(
        Script::restaurant_booking(),
        sessions.clone(),
        Arc::new(LlmSlotExtractor::new(completion.clone())),
    ));

    let pipeline = Arc::new(ChatPipeline::new(
        Arc::new(HeuristicDetector::default()),
        Arc::new(LexiconClassifier::default()),
        retriever,
        completion,
        translator,
        dialog,
        FeatureCatalog::new(feature_keywords),
        TriggerDetector::new(restaurant_keywords),
        PersonaStore::new(settings.prompts_dir.clone()),
        ProverbPicker::new(proverbs),
    ));

    let app = create_app_router(AppState::new(pipeline, sessions));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(%addr, "hugdimon listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
