//! Required-feature extraction
//!
//! Derives boolean facts ("wants outdoor seating") from user text plus a
//! language tag, using per-language keyword tables. A feature is only ever
//! recorded as required; absence means unconstrained, never "must not have".

use std::collections::BTreeMap;

use crate::config::{FeatureKeywords, DEFAULT_LANG};

/// Features the user's message requires. Ordered map so the cache-key
/// rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFeatures(BTreeMap<String, bool>);

impl RequiredFeatures {
    pub fn require(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), true);
    }

    /// Whether this feature is explicitly required. Absent keys are not.
    pub fn requires(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Stable rendering used in retrieval cache keys.
    pub fn cache_key(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Keyword-table driven extractor. Pure; unknown languages silently fall
/// back to the default language's keyword lists.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    keywords: FeatureKeywords,
}

impl FeatureCatalog {
    pub fn new(keywords: FeatureKeywords) -> Self {
        Self { keywords }
    }

    pub fn extract(&self, text: &str, lang: &str) -> RequiredFeatures {
        let lowered = text.to_lowercase();
        let mut required = RequiredFeatures::default();

        for (feature, by_lang) in &self.keywords.features {
            let keywords = by_lang
                .get(lang)
                .or_else(|| by_lang.get(DEFAULT_LANG))
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            if keywords.iter().any(|k| lowered.contains(&k.to_lowercase())) {
                required.require(feature.clone());
            }
        }

        required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FeatureCatalog {
        let yaml = r#"
features:
  has_terrace:
    en: ["terrace", "outdoor", "patio"]
    es: ["terraza", "exterior"]
    ru: ["террас"]
  sea_view:
    en: ["sea view", "ocean view"]
    es: ["vista al mar"]
  booking:
    en: ["book", "reserve", "reservation"]
    es: ["reservar", "reserva"]
"#;
        FeatureCatalog::new(FeatureKeywords::load_from_str(yaml).unwrap())
    }

    #[test]
    fn test_extracts_required_features() {
        let req = catalog().extract("A nice terrace with sea view please", "en");
        assert!(req.requires("has_terrace"));
        assert!(req.requires("sea_view"));
        assert!(!req.requires("booking"));
    }

    #[test]
    fn test_absent_features_are_unconstrained() {
        let req = catalog().extract("just a quiet place", "en");
        assert!(req.is_empty());
        assert!(!req.requires("has_terrace"));
    }

    #[test]
    fn test_language_specific_keywords() {
        let req = catalog().extract("quiero una terraza", "es");
        assert!(req.requires("has_terrace"));
    }

    #[test]
    fn test_unsupported_language_falls_back_to_default() {
        let req = catalog().extract("an outdoor patio", "xx");
        assert!(req.requires("has_terrace"));
    }

    #[test]
    fn test_cache_key_is_sorted_and_stable() {
        let mut req = RequiredFeatures::default();
        req.require("sea_view");
        req.require("has_terrace");
        assert_eq!(req.cache_key(), "has_terrace=true,sea_view=true");
    }
}
