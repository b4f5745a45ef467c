//! Reply composition
//!
//! Builds the structured context block handed to the completion generator,
//! and assembles the final reply: generated text, proverb line, and a labeled
//! translation line whose label is looked up per language.

use crate::chat::features::RequiredFeatures;
use crate::chat::ranking::RankedPlace;
use crate::clients::Place;

/// Per-language label for the translation line. Unknown languages get the
/// generic English label.
const TRANSLATION_LABELS: [(&str, &str); 8] = [
    ("en", "Translation"),
    ("es", "Traducción"),
    ("fr", "Traduction"),
    ("de", "Übersetzung"),
    ("it", "Traduzione"),
    ("pt", "Tradução"),
    ("ru", "Перевод"),
    ("ca", "Traducció (EN)"),
];

pub fn translation_label(lang: &str) -> &'static str {
    TRANSLATION_LABELS
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, label)| *label)
        .unwrap_or("Translation")
}

fn relevance_marker(score: f32) -> &'static str {
    if score > 0.8 {
        "⭐⭐⭐"
    } else if score > 0.5 {
        "⭐⭐"
    } else {
        "⭐"
    }
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "Yes"
    } else {
        "No"
    }
}

/// Structured context block summarizing the ranked results for the
/// completion generator, plus a natural-language count of how many places
/// match each requested feature.
pub fn build_context_block(ranked: &[RankedPlace], required: &RequiredFeatures) -> String {
    let mut context =
        String::from("You have the following structured information about places in Cadaqués:\n");

    for r in ranked {
        let place = &r.place;
        context.push_str(&format!(
            "\nName: {} {}\nCategory: {}\nDescription: {}\nHas terrace: {}\nSea view: {}\nBooking available: {}\nEmail: {}\n---\n",
            place.name,
            relevance_marker(r.final_score),
            place.category,
            place.description,
            yes_no(place.feature("has_terrace")),
            yes_no(place.feature("sea_view")),
            yes_no(place.has_booking()),
            place.email.as_deref().unwrap_or("Unknown"),
        ));
    }

    let mut summary = Vec::new();
    if required.requires("has_terrace") {
        summary.push("with terrace");
    }
    if required.requires("sea_view") {
        summary.push("with sea view");
    }
    if required.requires("booking") {
        summary.push("with booking available");
    }
    if !summary.is_empty() {
        context.push_str(&format!(
            "\nThere are {} places {} in Cadaqués.\n",
            ranked.len(),
            summary.join(", ")
        ));
    }

    context
}

/// Final reply: generated text, proverb, labeled translation line.
pub fn compose_reply(
    generated: &str,
    catalan_proverb: &str,
    english_translation: &str,
    translated: &str,
    lang: &str,
) -> String {
    let mut reply = format!("{generated}\n\n😺 Refrany: {catalan_proverb}");
    match lang {
        "en" => reply.push_str(&format!("\n🌟 Translation: {english_translation}")),
        "ca" => reply.push_str(&format!("\n🌟 Traducció (EN): {english_translation}")),
        other => reply.push_str(&format!("\n🌟 {}: {translated}", translation_label(other))),
    }
    reply
}

/// Plain place listing for the guide endpoint (no LLM involved).
pub fn format_place_listing(places: &[Place]) -> String {
    if places.is_empty() {
        return "No places found matching your criteria.".to_string();
    }

    let mut out = String::new();
    for place in places {
        let booking = if place.has_booking() {
            "Booking available"
        } else {
            "No booking"
        };
        out.push_str(&format!(
            "\n{}: {}\n{}. Contact: {}\n",
            place.name,
            place.description,
            booking,
            place.email.as_deref().unwrap_or("Unknown"),
        ));
        if place.feature("has_terrace") {
            out.push_str("This place has a terrace.\n");
        }
        if place.feature("sea_view") {
            out.push_str("This place has a sea view.\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ranked(name: &str, score: f32) -> RankedPlace {
        RankedPlace {
            place: Place {
                name: name.to_string(),
                category: "restaurant".to_string(),
                description: "by the harbour".to_string(),
                features: HashMap::from([("has_terrace".to_string(), true)]),
                email: Some("info@example.com".to_string()),
                score: Some(score),
            },
            final_score: score,
        }
    }

    #[test]
    fn test_context_block_contains_place_fields() {
        let required = RequiredFeatures::default();
        let ctx = build_context_block(&[ranked("Bar Maritim", 0.9)], &required);
        assert!(ctx.contains("Name: Bar Maritim ⭐⭐⭐"));
        assert!(ctx.contains("Has terrace: Yes"));
        assert!(ctx.contains("Email: info@example.com"));
        assert!(!ctx.contains("There are"));
    }

    #[test]
    fn test_context_block_counts_matches_per_feature() {
        let mut required = RequiredFeatures::default();
        required.require("has_terrace");
        let ctx = build_context_block(&[ranked("A", 0.6), ranked("B", 0.4)], &required);
        assert!(ctx.contains("There are 2 places with terrace in Cadaqués."));
    }

    #[test]
    fn test_compose_reply_labels_by_language() {
        let en = compose_reply("Hi", "Qui no arrisca, no pisca.", "Who doesn't risk...", "", "en");
        assert!(en.contains("🌟 Translation: Who doesn't risk..."));

        let ca = compose_reply("Hola", "Qui no arrisca, no pisca.", "Who doesn't risk...", "", "ca");
        assert!(ca.contains("Traducció (EN): Who doesn't risk..."));

        let ru = compose_reply("Привет", "Refrany", "English", "Русский перевод", "ru");
        assert!(ru.contains("🌟 Перевод: Русский перевод"));

        let unknown = compose_reply("Hi", "Refrany", "English", "translated", "xx");
        assert!(unknown.contains("🌟 Translation: translated"));
    }

    #[test]
    fn test_empty_listing_message() {
        assert_eq!(
            format_place_listing(&[]),
            "No places found matching your criteria."
        );
    }
}
