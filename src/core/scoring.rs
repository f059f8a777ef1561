//! Candidate scoring and selection.
//!
//! The search backend is free text, so every response mixes the postcode
//! boundary we want with streets, towns and admin areas that merely mention
//! it. Each candidate gets an additive score; the best geometry-bearing one
//! is accepted only if it clears the confidence threshold.

use crate::domain::model::{PostcodeFragment, ScoredCandidate, SearchCandidate};
use serde::{Deserialize, Serialize};

/// Category and subtype match a postal code boundary exactly.
pub const POSTAL_CODE_BOUNDARY_BONUS: f64 = 100.0;
/// Label starts with the fragment followed by `,` or a space.
pub const LABEL_PREFIX_BONUS: f64 = 80.0;
/// Label mentions the fragment somewhere other than the start.
pub const LABEL_CONTAINS_BONUS: f64 = 25.0;
/// Address metadata postcode starts with the fragment.
pub const STRUCTURED_POSTCODE_BONUS: f64 = 50.0;
/// Multiplier for the upstream importance in [0, 1].
pub const IMPORTANCE_FACTOR: f64 = 10.0;
/// Boundaries of a neighbouring but wrong category.
pub const PENALIZED_BOUNDARY_PENALTY: f64 = 60.0;
/// Minimum score a top candidate needs to be accepted.
pub const CONFIDENCE_THRESHOLD: f64 = 50.0;

pub const BOUNDARY_CLASS: &str = "boundary";
pub const POSTAL_CODE_TYPE: &str = "postal_code";
pub const PENALIZED_BOUNDARY_TYPES: [&str; 5] =
    ["administrative", "county", "city", "suburb", "borough"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub postal_code_boundary: f64,
    pub label_prefix: f64,
    pub label_contains: f64,
    pub structured_postcode: f64,
    pub importance_factor: f64,
    pub penalized_boundary: f64,
    pub threshold: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            postal_code_boundary: POSTAL_CODE_BOUNDARY_BONUS,
            label_prefix: LABEL_PREFIX_BONUS,
            label_contains: LABEL_CONTAINS_BONUS,
            structured_postcode: STRUCTURED_POSTCODE_BONUS,
            importance_factor: IMPORTANCE_FACTOR,
            penalized_boundary: PENALIZED_BOUNDARY_PENALTY,
            threshold: CONFIDENCE_THRESHOLD,
        }
    }
}

/// Score one candidate against the fragment that was searched for.
pub fn score(candidate: &SearchCandidate, fragment: &PostcodeFragment, weights: &ScoringWeights) -> f64 {
    let query = fragment.as_str().to_uppercase();
    let is_boundary = candidate.classification == BOUNDARY_CLASS;
    let mut total = 0.0;

    if is_boundary && candidate.subtype == POSTAL_CODE_TYPE {
        total += weights.postal_code_boundary;
    }

    let label = candidate.display_name.to_uppercase();
    if label_starts_with_query(&label, &query) {
        total += weights.label_prefix;
    } else if label.contains(&query) {
        total += weights.label_contains;
    }

    if let Some(postcode) = &candidate.structured_postcode {
        let postcode = postcode.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        if postcode.starts_with(&query) {
            total += weights.structured_postcode;
        }
    }

    total += candidate.importance.unwrap_or(0.0) * weights.importance_factor;

    if is_boundary && PENALIZED_BOUNDARY_TYPES.contains(&candidate.subtype.as_str()) {
        total -= weights.penalized_boundary;
    }

    total
}

fn label_starts_with_query(label: &str, query: &str) -> bool {
    match label.strip_prefix(query) {
        Some(rest) => rest.starts_with(',') || rest.starts_with(' '),
        None => false,
    }
}

/// Score every geometry-bearing candidate, best first. Equal scores keep
/// their input order.
pub fn rank(
    candidates: Vec<SearchCandidate>,
    fragment: &PostcodeFragment,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(SearchCandidate::has_boundary_geometry)
        .map(|candidate| {
            let score = score(&candidate, fragment, weights);
            tracing::debug!(
                "  {:>7.2}  {} [{}/{}]",
                score,
                candidate.display_name,
                candidate.classification,
                candidate.subtype
            );
            ScoredCandidate { candidate, score }
        })
        .collect();

    // sort_by is stable; a NaN score sorts below every real one
    let key = |score: f64| if score.is_nan() { f64::NEG_INFINITY } else { score };
    scored.sort_by(|a, b| key(b.score).total_cmp(&key(a.score)));
    scored
}

/// Top-ranked candidate if it clears the threshold.
pub fn select_best(
    candidates: Vec<SearchCandidate>,
    fragment: &PostcodeFragment,
    weights: &ScoringWeights,
) -> Option<ScoredCandidate> {
    rank(candidates, fragment, weights)
        .into_iter()
        .next()
        .filter(|best| best.score >= weights.threshold)
}
