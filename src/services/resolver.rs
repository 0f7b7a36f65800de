//! Merges the scorer's suggestion with the language model's command.

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::models::ToolAction;
use crate::services::scorer::{self, MatchSuggestion};

/// Outcome of merging one turn's navigation intent.
///
/// `current_model` is the session's default model *after* this turn; the
/// caller stores it back into session state. Passing it in and out
/// explicitly keeps the default session-scoped; concurrent sessions never
/// see each other's navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The merged action, or the language model's action untouched when the
    /// scorer had nothing to contribute.
    pub action: Option<ToolAction>,
    pub suggestion: Option<MatchSuggestion>,
    /// True when this turn counts as a navigation event: an action was
    /// synthesized, a gap was filled, or the model already agreed with the
    /// scorer.
    pub applied: bool,
    /// True when a missing field was filled from the suggestion.
    pub auto_filled: bool,
    pub current_model: Option<String>,
}

/// Effective (model id, viewpoint id) for a merged action.
///
/// Model id: action's explicit value, else the suggestion's, else the
/// session default. Viewpoint id: action's explicit target, else the
/// fragment a directional operation implies, else the suggestion's.
pub fn effective_ids(
    catalog: &Catalog,
    action: Option<&ToolAction>,
    suggestion: Option<&MatchSuggestion>,
    current_model: Option<&str>,
) -> (Option<String>, Option<String>) {
    let model_id = action
        .and_then(|a| a.model_id())
        .or(suggestion.map(|s| s.model_id.as_str()))
        .or(current_model)
        .map(String::from);

    let viewpoint_id = action
        .and_then(|a| a.target())
        .map(String::from)
        .or_else(|| {
            let fragment = action.and_then(|a| a.direction_fragment())?;
            let model_id = model_id.as_deref()?;
            catalog
                .viewpoint_with_fragment(model_id, fragment)
                .map(|vp| vp.id.clone())
        })
        .or_else(|| suggestion.map(|s| s.viewpoint_id.clone()));

    (model_id, viewpoint_id)
}

/// Merge the scorer's suggestion with the language model's action for one
/// utterance.
///
/// Gaps are filled from the suggestion; explicit fields are never
/// overwritten. Without a suggestion the action passes through unchanged.
pub fn resolve(
    catalog: &Catalog,
    config: &ScoringConfig,
    query: &str,
    llm_action: Option<ToolAction>,
    current_model: Option<&str>,
) -> Resolution {
    let Some(suggestion) = scorer::suggest(catalog, query, config) else {
        return Resolution {
            action: llm_action,
            suggestion: None,
            applied: false,
            auto_filled: false,
            current_model: current_model.map(String::from),
        };
    };

    let mut applied = false;
    let mut auto_filled = false;

    let mut action = match llm_action {
        Some(action) if action.is_navigable() => action,
        other => {
            // No usable command from the language model: the scorer's pick
            // becomes the action, tagged as auto-selected.
            if let Some(discarded) = other {
                debug!(op = discarded.op_name(), "replacing non-navigable action");
            }
            applied = true;
            ToolAction::Navigate {
                target: Some(suggestion.viewpoint_id.clone()),
                model_id: Some(suggestion.model_id.clone()),
                auto_selected: true,
                matched_terms: suggestion.matched_terms.clone(),
                reason: Some(suggestion.reason.clone()),
            }
        }
    };

    if action.fill_model_id(&suggestion.model_id) {
        applied = true;
        auto_filled = true;
    }
    if let ToolAction::Navigate { target, .. } = &mut action {
        if target.is_none() {
            *target = Some(suggestion.viewpoint_id.clone());
            applied = true;
            auto_filled = true;
        }
    }

    let (model_id, viewpoint_id) =
        effective_ids(catalog, Some(&action), Some(&suggestion), current_model);

    // The language model may have independently landed on the scorer's pick;
    // that agreement is still a navigation event.
    if model_id.as_deref() == Some(suggestion.model_id.as_str())
        && viewpoint_id.as_deref() == Some(suggestion.viewpoint_id.as_str())
    {
        applied = true;
    }

    let current_model = if applied {
        model_id.or_else(|| current_model.map(String::from))
    } else {
        current_model.map(String::from)
    };

    Resolution {
        action: Some(action),
        suggestion: Some(suggestion),
        applied,
        auto_filled,
        current_model,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{AnatomyModel, CameraPose, Vec3, Viewpoint};

    fn viewpoint(id: &str, name: &str) -> Viewpoint {
        Viewpoint {
            id: id.to_string(),
            name: name.to_string(),
            button_label: name.to_string(),
            camera: CameraPose {
                position: Vec3 {
                    x: 0.0,
                    y: 0.0,
                    z: 3.0,
                },
                target: Vec3 {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            },
            description: None,
            clinical_context: None,
            common_use_cases: Vec::new(),
            anatomy_visible: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_models(vec![
            AnatomyModel {
                id: "shoulder".to_string(),
                name: "Shoulder Complex".to_string(),
                model_url: "https://assets.example/shoulder.glb".to_string(),
                description: String::new(),
                viewpoints: vec![
                    viewpoint("front_view", "Front View"),
                    viewpoint("right_shoulder", "Right Shoulder View"),
                ],
                ai_context: None,
            },
            AnatomyModel {
                id: "knee".to_string(),
                name: "Knee Joint".to_string(),
                model_url: "https://assets.example/knee.glb".to_string(),
                description: String::new(),
                viewpoints: vec![viewpoint("knee_front", "Knee Front View")],
                ai_context: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn no_llm_action_synthesizes_navigate() {
        let catalog = catalog();
        let config = ScoringConfig::default();

        let resolution = resolve(&catalog, &config, "right shoulder please", None, None);
        assert!(resolution.applied);
        let ToolAction::Navigate {
            target,
            model_id,
            auto_selected,
            ..
        } = resolution.action.unwrap()
        else {
            panic!("expected navigate");
        };
        assert_eq!(target.as_deref(), Some("right_shoulder"));
        assert_eq!(model_id.as_deref(), Some("shoulder"));
        assert!(auto_selected);
        assert_eq!(resolution.current_model.as_deref(), Some("shoulder"));
    }

    #[test]
    fn no_suggestion_passes_action_through() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let action = ToolAction::ShowFront {
            model_id: Some("knee".to_string()),
        };

        let resolution = resolve(
            &catalog,
            &config,
            "",
            Some(action.clone()),
            Some("shoulder"),
        );
        assert!(!resolution.applied);
        assert_eq!(resolution.action, Some(action));
        assert!(resolution.suggestion.is_none());
        // Session default is untouched on a pass-through turn.
        assert_eq!(resolution.current_model.as_deref(), Some("shoulder"));
    }

    #[test]
    fn explicit_model_id_is_never_overwritten() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        // Scorer will suggest the shoulder model, but the language model
        // explicitly asked for the knee.
        let action = ToolAction::Navigate {
            target: Some("knee_front".to_string()),
            model_id: Some("knee".to_string()),
            auto_selected: false,
            matched_terms: Vec::new(),
            reason: None,
        };

        let resolution = resolve(&catalog, &config, "right shoulder", Some(action), None);
        let merged = resolution.action.unwrap();
        assert_eq!(merged.model_id(), Some("knee"));
        assert_eq!(merged.target(), Some("knee_front"));
        assert!(!resolution.auto_filled);
    }

    #[test]
    fn missing_model_id_is_filled_from_suggestion() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let action = ToolAction::ShowViewpoint {
            target: Some("front_view".to_string()),
            model_id: None,
        };

        let resolution = resolve(&catalog, &config, "right shoulder", Some(action), None);
        assert!(resolution.applied);
        assert!(resolution.auto_filled);
        assert_eq!(resolution.action.unwrap().model_id(), Some("shoulder"));
    }

    #[test]
    fn navigate_without_target_gets_suggested_viewpoint() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let action = ToolAction::Navigate {
            target: None,
            model_id: None,
            auto_selected: false,
            matched_terms: Vec::new(),
            reason: None,
        };

        let resolution = resolve(&catalog, &config, "right shoulder", Some(action), None);
        assert_eq!(resolution.action.unwrap().target(), Some("right_shoulder"));
        assert!(resolution.applied);
    }

    #[test]
    fn agreement_with_scorer_counts_as_applied() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let action = ToolAction::Navigate {
            target: Some("right_shoulder".to_string()),
            model_id: Some("shoulder".to_string()),
            auto_selected: false,
            matched_terms: Vec::new(),
            reason: None,
        };

        let resolution = resolve(&catalog, &config, "right shoulder", Some(action), None);
        assert!(resolution.applied);
        assert!(!resolution.auto_filled);
    }

    #[test]
    fn directional_action_resolves_viewpoint_by_id_fragment() {
        let catalog = catalog();
        let action = ToolAction::ShowFront {
            model_id: Some("shoulder".to_string()),
        };

        let (model_id, viewpoint_id) = effective_ids(&catalog, Some(&action), None, None);
        assert_eq!(model_id.as_deref(), Some("shoulder"));
        assert_eq!(viewpoint_id.as_deref(), Some("front_view"));
    }

    #[test]
    fn session_default_backfills_missing_model() {
        let catalog = catalog();
        let action = ToolAction::ShowFront { model_id: None };

        let (model_id, viewpoint_id) =
            effective_ids(&catalog, Some(&action), None, Some("knee"));
        assert_eq!(model_id.as_deref(), Some("knee"));
        assert_eq!(viewpoint_id.as_deref(), Some("knee_front"));
    }
}
