//! Knowledge retriever collaborator
//!
//! Returns semantically relevant place records for a free-text query from a
//! pre-built vector index. The index and embedding engine are external; this
//! module defines the record shape and an HTTP client for a retrieval
//! sidecar service.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One retrieved place record, ephemeral per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Free-text description from the index.
    #[serde(default)]
    pub description: String,
    /// Structured flags: `has_terrace`, `sea_view`, `booking`.
    #[serde(default)]
    pub features: HashMap<String, bool>,
    #[serde(default)]
    pub email: Option<String>,
    /// Retriever-reported relevance, when the backend is calibrated.
    #[serde(default)]
    pub score: Option<f32>,
}

impl Place {
    pub fn feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    pub fn has_booking(&self) -> bool {
        self.feature("booking")
    }
}

#[async_trait]
pub trait PlaceRetriever: Send + Sync {
    /// Query the index; results come back in retriever order, at most `top_k`.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<Place>>;
}

/// HTTP client for the retrieval sidecar (`POST /query`).
#[derive(Clone)]
pub struct HttpRetriever {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRetriever {
    pub fn new(base_url: String) -> Result<Self> {
        // Per-attempt timing is owned by the resilient call wrapper, so the
        // client itself carries no timeout.
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PlaceRetriever for HttpRetriever {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<Place>> {
        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(&serde_json::json!({
                "query": text,
                "top_k": top_k,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("retriever error {status}: {body}"));
        }

        #[derive(Deserialize)]
        struct ApiResponse {
            results: Vec<Place>,
        }

        let api_response: ApiResponse = response.json().await?;
        Ok(api_response.results)
    }
}
