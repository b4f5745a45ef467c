//! Configuration: environment settings and YAML keyword tables
//!
//! Keyword tables (restaurant triggers, feature keywords) live in YAML files
//! under `config/` and are loaded once at startup. Runtime settings come from
//! environment variables, `.env` friendly via dotenvy in the server binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Languages the pipeline fully supports (personas, prompts, labels).
pub const SUPPORTED_LANGS: [&str; 6] = ["en", "es", "fr", "de", "ca", "ru"];

/// Fallback language for everything: detection, personas, keyword tables.
pub const DEFAULT_LANG: &str = "en";

pub fn is_supported_lang(lang: &str) -> bool {
    SUPPORTED_LANGS.contains(&lang)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(String),
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub config_dir: PathBuf,
    pub prompts_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub retriever_url: Option<String>,
    pub translator_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            config_dir: std::env::var("CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config")),
            prompts_dir: std::env::var("PROMPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("prompts")),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            retriever_url: std::env::var("RETRIEVER_URL").ok(),
            translator_url: std::env::var("TRANSLATOR_URL").ok(),
        }
    }
}

/// Restaurant trigger keywords per language, loaded from
/// `config/restaurant_keywords.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantKeywords {
    #[serde(default)]
    pub keywords: HashMap<String, Vec<String>>,
}

impl RestaurantKeywords {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let loaded = Self::load_from_str(&content)?;
        info!(
            path = %path.display(),
            languages = loaded.keywords.len(),
            "loaded restaurant keywords"
        );
        Ok(loaded)
    }

    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn for_lang(&self, lang: &str) -> &[String] {
        self.keywords.get(lang).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Feature keyword tables: feature name → language → keyword list, loaded
/// from `config/feature_keywords.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureKeywords {
    #[serde(default)]
    pub features: HashMap<String, HashMap<String, Vec<String>>>,
}

impl FeatureKeywords {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let loaded = Self::load_from_str(&content)?;
        info!(
            path = %path.display(),
            features = loaded.features.len(),
            "loaded feature keywords"
        );
        Ok(loaded)
    }

    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_restaurant_keywords_from_yaml() {
        let yaml = r#"
keywords:
  en: ["restaurant", "book a table"]
  es: ["restaurante"]
"#;
        let kw = RestaurantKeywords::load_from_str(yaml).unwrap();
        assert_eq!(kw.for_lang("en").len(), 2);
        assert_eq!(kw.for_lang("es"), ["restaurante"]);
        assert!(kw.for_lang("xx").is_empty());
    }

    #[test]
    fn test_feature_keywords_from_yaml() {
        let yaml = r#"
features:
  has_terrace:
    en: ["terrace", "outdoor"]
    es: ["terraza"]
"#;
        let fk = FeatureKeywords::load_from_str(yaml).unwrap();
        assert_eq!(fk.features["has_terrace"]["en"].len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "keywords:\n  en: [\"restaurant\"]").unwrap();
        let kw = RestaurantKeywords::load_from_file(f.path()).unwrap();
        assert_eq!(kw.for_lang("en"), ["restaurant"]);
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let err = RestaurantKeywords::load_from_str(": not yaml [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
