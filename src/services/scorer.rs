//! Deterministic relevance scoring of utterances against the catalog.

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::models::{AnatomyModel, Viewpoint};
use crate::query::{normalize, QueryAnalysis};

/// Phrases shorter than this never count as a hit; two-letter fragments
/// match far too much prose to be a signal.
const MIN_PHRASE_CHARS: usize = 3;

/// Directional query tokens, the viewpoint-id fragment each one implies,
/// and which boost bucket it draws from.
const DIRECTION_BOOSTS: &[(&str, &str, BoostKind)] = &[
    ("right", "right", BoostKind::Lateral),
    ("left", "left", BoostKind::Lateral),
    ("front", "front", BoostKind::Orientation),
    ("anterior", "front", BoostKind::Orientation),
    ("back", "back", BoostKind::Orientation),
    ("posterior", "back", BoostKind::Orientation),
    ("neck", "neck", BoostKind::Neck),
];

#[derive(Debug, Clone, Copy)]
enum BoostKind {
    Lateral,
    Orientation,
    Neck,
}

impl BoostKind {
    fn weight(self, config: &ScoringConfig) -> f64 {
        match self {
            BoostKind::Lateral => config.lateral_boost,
            BoostKind::Orientation => config.orientation_boost,
            BoostKind::Neck => config.neck_boost,
        }
    }
}

/// The scorer's best (model, viewpoint) candidate for one query.
///
/// Created fresh per query; carries everything downstream consumers need so
/// they never have to re-run the scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSuggestion {
    pub model_id: String,
    pub model_name: String,
    pub viewpoint_id: String,
    pub viewpoint_name: String,
    pub model_url: String,
    pub score: f64,
    /// De-duplicated query fragments that produced hits, in hit order.
    pub matched_terms: Vec<String>,
    /// Human-readable explanation listing up to three matched fragments.
    pub reason: String,
}

/// First query phrase (≥ 3 chars) contained in the field's normalized text.
///
/// The first hit stops the scan: a field contributes its weight at most
/// once, but separate fields each contribute independently.
fn field_hit(analysis: &QueryAnalysis, field: &str) -> Option<String> {
    if field.is_empty() {
        return None;
    }
    let normalized = normalize(field);
    analysis
        .phrases()
        .filter(|p| p.chars().count() >= MIN_PHRASE_CHARS)
        .find(|p| normalized.contains(p))
        .map(String::from)
}

/// Recursively collect string leaves (including strings inside arrays) out
/// of the free-form anatomyVisible structure.
fn anatomy_leaves(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                anatomy_leaves(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                anatomy_leaves(item, out);
            }
        }
        _ => {}
    }
}

/// Running score for one (model, viewpoint) candidate.
struct Candidate {
    score: f64,
    terms: Vec<String>,
}

impl Candidate {
    fn add(&mut self, weight: f64, term: String) {
        self.score += weight;
        self.terms.push(term);
    }
}

fn score_model_fields(
    analysis: &QueryAnalysis,
    model: &AnatomyModel,
    config: &ScoringConfig,
) -> Candidate {
    let mut candidate = Candidate {
        score: 0.0,
        terms: Vec::new(),
    };
    for topic in model.topics() {
        if let Some(term) = field_hit(analysis, topic) {
            candidate.add(config.topic_weight, term);
        }
    }
    if let Some(term) = field_hit(analysis, &model.name) {
        candidate.add(config.model_name_weight, term);
    }
    if let Some(term) = field_hit(analysis, &model.description) {
        candidate.add(config.model_description_weight, term);
    }
    candidate
}

fn score_viewpoint_fields(
    candidate: &mut Candidate,
    analysis: &QueryAnalysis,
    model: &AnatomyModel,
    viewpoint: &Viewpoint,
    config: &ScoringConfig,
) {
    for phrase in model.view_context(&viewpoint.id) {
        if let Some(term) = field_hit(analysis, phrase) {
            candidate.add(config.view_context_weight, term);
        }
    }
    if let Some(term) = field_hit(analysis, &viewpoint.name) {
        candidate.add(config.viewpoint_name_weight, term);
    }
    if let Some(desc) = &viewpoint.description {
        if let Some(term) = field_hit(analysis, desc) {
            candidate.add(config.viewpoint_description_weight, term);
        }
    }
    if let Some(clinical) = &viewpoint.clinical_context {
        if let Some(term) = field_hit(analysis, clinical) {
            candidate.add(config.clinical_context_weight, term);
        }
    }
    for use_case in &viewpoint.common_use_cases {
        if let Some(term) = field_hit(analysis, use_case) {
            candidate.add(config.use_case_weight, term);
        }
    }
    if let Some(visible) = &viewpoint.anatomy_visible {
        let mut leaves = Vec::new();
        anatomy_leaves(visible, &mut leaves);
        for leaf in &leaves {
            if let Some(term) = field_hit(analysis, leaf) {
                candidate.add(config.anatomy_leaf_weight, term);
            }
        }
    }
    for &(token, fragment, kind) in DIRECTION_BOOSTS {
        if analysis.has_token(token) && viewpoint.id.contains(fragment) {
            candidate.add(kind.weight(config), token.to_string());
        }
    }
}

/// Score every (model, viewpoint) pair and return the single best above the
/// minimum threshold, or none.
///
/// Pure and deterministic: same catalog and query always produce the same
/// suggestion. Ties keep the pair encountered first in catalog order, so
/// catalog file order is the tie-break policy.
pub fn suggest(
    catalog: &Catalog,
    query: &str,
    config: &ScoringConfig,
) -> Option<MatchSuggestion> {
    let analysis = QueryAnalysis::new(query);
    if analysis.is_empty() {
        return None;
    }

    let mut best: Option<MatchSuggestion> = None;

    for model in catalog.models() {
        let model_candidate = score_model_fields(&analysis, model, config);

        for viewpoint in &model.viewpoints {
            let mut candidate = Candidate {
                score: model_candidate.score,
                terms: model_candidate.terms.clone(),
            };
            score_viewpoint_fields(&mut candidate, &analysis, model, viewpoint, config);

            // Strictly greater replaces; equal keeps the earlier pair.
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(MatchSuggestion {
                    model_id: model.id.clone(),
                    model_name: model.name.clone(),
                    viewpoint_id: viewpoint.id.clone(),
                    viewpoint_name: viewpoint.name.clone(),
                    model_url: model.model_url.clone(),
                    score: candidate.score,
                    matched_terms: dedup_terms(candidate.terms),
                    reason: String::new(),
                });
            }
        }
    }

    let mut best = best?;
    if best.score < config.min_score {
        debug!(
            score = best.score,
            threshold = config.min_score,
            "best match below threshold, rejecting"
        );
        return None;
    }

    best.reason = build_reason(&best.matched_terms);
    debug!(
        model = %best.model_id,
        viewpoint = %best.viewpoint_id,
        score = best.score,
        "suggesting viewpoint"
    );
    Some(best)
}

/// Drop repeated fragments while keeping first-hit order.
fn dedup_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

fn build_reason(terms: &[String]) -> String {
    if terms.is_empty() {
        return "Best available viewpoint".to_string();
    }
    let listed: Vec<&str> = terms.iter().take(3).map(String::as_str).collect();
    format!("Matched: {}", listed.join(", "))
}
