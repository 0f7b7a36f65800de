//! Integration tests for the relevance scorer's ranking contract.

mod common;

use common::{standard_catalog, ModelBuilder, ViewpointBuilder};
use pretty_assertions::assert_eq;
use somaview::config::ScoringConfig;
use somaview::services::suggest;

#[test]
fn every_returned_match_clears_the_threshold() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();

    let queries = [
        "show me the right shoulder",
        "left side",
        "neck pain after whiplash",
        "rotator cuff tear",
        "something entirely unrelated",
        "xyz",
        "",
    ];
    for query in queries {
        if let Some(suggestion) = suggest(&catalog, query, &config) {
            assert!(
                suggestion.score >= config.min_score,
                "query {:?} produced sub-threshold score {}",
                query,
                suggestion.score
            );
        }
    }
}

#[test]
fn right_shoulder_scenario() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();

    let suggestion = suggest(&catalog, "show me the right shoulder", &config).unwrap();
    assert_eq!(suggestion.model_id, "shoulder");
    assert_eq!(suggestion.viewpoint_id, "right_shoulder");
    assert_eq!(suggestion.viewpoint_name, "Right Shoulder View");
    assert!(suggestion.matched_terms.contains(&"right".to_string()));
    assert_eq!(suggestion.model_url, "https://assets.example/shoulder.glb");
}

#[test]
fn suggest_is_deterministic_across_calls() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();

    let first = suggest(&catalog, "neck pain after whiplash", &config).unwrap();
    let second = suggest(&catalog, "neck pain after whiplash", &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.model_id, "cervical_spine");
    assert_eq!(first.viewpoint_id, "neck_lateral");
}

#[test]
fn single_view_context_hit_clears_threshold() {
    let catalog = somaview::catalog::Catalog::from_models(vec![ModelBuilder::new("heart", "Heart")
        .view_context("apex", "mitral valve")
        .viewpoint(ViewpointBuilder::new("apex", "Apex").build())
        .build()])
    .unwrap();
    let config = ScoringConfig::default();

    let suggestion = suggest(&catalog, "mitral regurgitation", &config).unwrap();
    assert_eq!(suggestion.viewpoint_id, "apex");
    assert_eq!(suggestion.score, config.view_context_weight);
}

#[test]
fn no_hits_is_absent_not_zero() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();
    assert!(suggest(&catalog, "qqq zzz vvv", &config).is_none());
}

#[test]
fn empty_query_is_absent() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();
    assert!(suggest(&catalog, "", &config).is_none());
    assert!(suggest(&catalog, " \t ", &config).is_none());
    assert!(suggest(&catalog, "!!!", &config).is_none());
}

#[test]
fn equal_scores_keep_catalog_order() {
    let catalog = somaview::catalog::Catalog::from_models(vec![
        ModelBuilder::new("m1", "Alpha")
            .viewpoint(ViewpointBuilder::new("lumbar_view", "Lumbar View").build())
            .build(),
        ModelBuilder::new("m2", "Beta")
            .viewpoint(ViewpointBuilder::new("lumbar_view", "Lumbar View").build())
            .build(),
    ])
    .unwrap();
    let config = ScoringConfig::default();

    let suggestion = suggest(&catalog, "lumbar view", &config).unwrap();
    assert_eq!(suggestion.model_id, "m1");
}

#[test]
fn raised_threshold_rejects_weak_matches() {
    let catalog = standard_catalog();
    let config = ScoringConfig {
        min_score: 100.0,
        ..ScoringConfig::default()
    };
    assert!(suggest(&catalog, "show me the right shoulder", &config).is_none());
}

#[test]
fn reason_lists_at_most_three_fragments() {
    let catalog = standard_catalog();
    let config = ScoringConfig::default();

    let suggestion = suggest(&catalog, "right shoulder rotator cuff tear", &config).unwrap();
    let listed = suggestion.reason.trim_start_matches("Matched: ");
    assert!(listed.split(", ").count() <= 3);
}
