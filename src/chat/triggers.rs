//! Restaurant-dialog trigger detection
//!
//! A message hands off to the booking dialog only when it contains a trigger
//! keyword belonging to the detected language and to no other configured
//! language. Words shared across languages (exact string matches) must never
//! trigger, whatever language they came in with.

use crate::config::RestaurantKeywords;

#[derive(Debug, Clone)]
pub struct TriggerDetector {
    keywords: RestaurantKeywords,
}

impl TriggerDetector {
    pub fn new(keywords: RestaurantKeywords) -> Self {
        Self { keywords }
    }

    /// True when `text` contains a keyword unique to `lang`.
    pub fn is_restaurant_trigger(&self, text: &str, lang: &str) -> bool {
        let lowered = text.to_lowercase();

        for keyword in self.keywords.for_lang(lang) {
            if !lowered.contains(&keyword.to_lowercase()) {
                continue;
            }
            let shared = self
                .keywords
                .keywords
                .iter()
                .filter(|(other_lang, _)| other_lang.as_str() != lang)
                .any(|(_, list)| list.contains(keyword));
            if !shared {
                return true;
            }
        }
        false
    }
}
