//! Retrieval result filtering and ranking
//!
//! Results whose feature flags contradict a required flag are dropped;
//! survivors are ranked by `score × positionDecay`, where the decay rewards
//! the retriever's own ordering (some backends return uncalibrated scores).

use crate::chat::features::RequiredFeatures;
use crate::clients::Place;

/// Per-position decay step in original retrieval order.
const POSITION_DECAY_STEP: f32 = 0.05;

/// Decay never drops below this floor.
const POSITION_DECAY_FLOOR: f32 = 0.05;

/// A place together with its final ranking score.
#[derive(Debug, Clone)]
pub struct RankedPlace {
    pub place: Place,
    pub final_score: f32,
}

/// Drop results that contradict a required feature. Features absent from
/// `required` never filter anything.
pub fn filter_by_features(places: Vec<Place>, required: &RequiredFeatures) -> Vec<Place> {
    places
        .into_iter()
        .filter(|p| required.iter().all(|(name, wanted)| !wanted || p.feature(name)))
        .collect()
}

/// Rank filtered results by retriever score weighted by position decay
/// `max(1 − 0.05×index, floor)`, highest first. Index is the position in the
/// original retrieval order.
pub fn rank(places: Vec<Place>) -> Vec<RankedPlace> {
    let mut ranked: Vec<RankedPlace> = places
        .into_iter()
        .enumerate()
        .map(|(i, place)| {
            let decay =
                (1.0 - POSITION_DECAY_STEP * i as f32).max(POSITION_DECAY_FLOOR);
            let final_score = place.score.unwrap_or(0.0) * decay;
            RankedPlace { place, final_score }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn place(name: &str, score: Option<f32>, features: &[(&str, bool)]) -> Place {
        Place {
            name: name.to_string(),
            category: "restaurant".to_string(),
            description: String::new(),
            features: features
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<_, _>>(),
            email: None,
            score,
        }
    }

    #[test]
    fn test_required_feature_filters_out_mismatches() {
        let mut required = RequiredFeatures::default();
        required.require("has_terrace");

        let places = vec![
            place("with", None, &[("has_terrace", true)]),
            place("without", None, &[("has_terrace", false)]),
            place("unknown", None, &[]),
        ];
        let kept = filter_by_features(places, &required);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "with");
    }

    #[test]
    fn test_unrequired_features_never_filter() {
        let required = RequiredFeatures::default();
        let places = vec![
            place("a", None, &[("has_terrace", false)]),
            place("b", None, &[("sea_view", false)]),
        ];
        assert_eq!(filter_by_features(places, &required).len(), 2);
    }

    #[test]
    fn test_rank_weights_score_by_position() {
        // Later high score can still win, but position decay matters.
        let places = vec![
            place("first", Some(0.6), &[]),
            place("second", Some(0.9), &[]),
        ];
        let ranked = rank(places);
        // 0.6*1.0 = 0.60 vs 0.9*0.95 = 0.855
        assert_eq!(ranked[0].place.name, "second");
        assert!((ranked[0].final_score - 0.855).abs() < 1e-6);
        assert!((ranked[1].final_score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_decay_has_a_floor() {
        let places: Vec<Place> = (0..30)
            .map(|i| place(&format!("p{i}"), Some(1.0), &[]))
            .collect();
        let ranked = rank(places);
        let min = ranked
            .iter()
            .map(|r| r.final_score)
            .fold(f32::INFINITY, f32::min);
        assert!((min - POSITION_DECAY_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn test_missing_scores_rank_last() {
        let places = vec![place("unscored", None, &[]), place("scored", Some(0.5), &[])];
        let ranked = rank(places);
        assert_eq!(ranked[0].place.name, "scored");
    }
}
