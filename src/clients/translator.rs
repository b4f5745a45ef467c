//! Translation collaborator
//!
//! Translates proverb companion text (English source) into the detected
//! language. Translation to the default language is the identity; the HTTP
//! implementation targets a LibreTranslate-style endpoint.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::DEFAULT_LANG;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` (assumed English) into `target_lang`.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP translator against a LibreTranslate-compatible `/translate` endpoint.
#[derive(Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranslator {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        if text.is_empty() || target_lang == DEFAULT_LANG {
            return Ok(text.to_string());
        }

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&serde_json::json!({
                "q": text,
                "source": DEFAULT_LANG,
                "target": target_lang,
                "format": "text"
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("translator error {status}: {body}"));
        }

        #[derive(Deserialize)]
        struct ApiResponse {
            #[serde(rename = "translatedText")]
            translated_text: String,
        }

        let api_response: ApiResponse = response.json().await?;
        Ok(api_response.translated_text)
    }
}

/// No-op translator used when no translation service is configured; keeps
/// the pipeline functional with English companion text.
#[derive(Debug, Clone, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_translator_passes_through() {
        let t = IdentityTranslator;
        assert_eq!(t.translate("hello", "fr").await.unwrap(), "hello");
    }
}
