use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A structured navigation command for one conversational turn.
///
/// Produced by the upstream language model or synthesized by the navigation
/// resolver, and consumed exactly once per turn. Each operation is a closed
/// variant carrying exactly the fields it needs; required/optional fields
/// are enforced at the serde boundary instead of checked ad hoc against an
/// open parameter bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ToolAction {
    /// Move the viewer to a specific viewpoint.
    Navigate {
        /// Viewpoint id. May be absent in a raw language-model action; the
        /// resolver fills it from the scorer's suggestion.
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        model_id: Option<String>,
        /// True when this action was synthesized from the scorer rather than
        /// issued explicitly by the language model.
        #[serde(default)]
        auto_selected: bool,
        /// Keyword fragments that matched, for explainability.
        #[serde(default)]
        matched_terms: Vec<String>,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Turn the model to face the camera.
    ShowFront {
        #[serde(default)]
        model_id: Option<String>,
    },
    /// Turn the model away from the camera.
    ShowBack {
        #[serde(default)]
        model_id: Option<String>,
    },
    ShowRightShoulder {
        #[serde(default)]
        model_id: Option<String>,
    },
    ShowLeftShoulder {
        #[serde(default)]
        model_id: Option<String>,
    },
    /// Move to a named viewpoint chosen from the catalog.
    ShowViewpoint {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        model_id: Option<String>,
    },
    /// Enumerate the viewpoints available on a model.
    ListViewpoints {
        #[serde(default)]
        model_id: Option<String>,
    },
}

impl ToolAction {
    /// Wire name of the operation, matching the serde tag.
    pub fn op_name(&self) -> &'static str {
        match self {
            ToolAction::Navigate { .. } => "navigate",
            ToolAction::ShowFront { .. } => "show_front",
            ToolAction::ShowBack { .. } => "show_back",
            ToolAction::ShowRightShoulder { .. } => "show_right_shoulder",
            ToolAction::ShowLeftShoulder { .. } => "show_left_shoulder",
            ToolAction::ShowViewpoint { .. } => "show_viewpoint",
            ToolAction::ListViewpoints { .. } => "list_viewpoints",
        }
    }

    /// Whether this operation moves the camera (everything except listing).
    pub fn is_navigable(&self) -> bool {
        !matches!(self, ToolAction::ListViewpoints { .. })
    }

    pub fn model_id(&self) -> Option<&str> {
        match self {
            ToolAction::Navigate { model_id, .. }
            | ToolAction::ShowFront { model_id }
            | ToolAction::ShowBack { model_id }
            | ToolAction::ShowRightShoulder { model_id }
            | ToolAction::ShowLeftShoulder { model_id }
            | ToolAction::ShowViewpoint { model_id, .. }
            | ToolAction::ListViewpoints { model_id } => model_id.as_deref(),
        }
    }

    /// Fill the model id when absent. Never overwrites an explicit value.
    /// Returns true when a fill actually happened.
    pub fn fill_model_id(&mut self, id: &str) -> bool {
        let slot = match self {
            ToolAction::Navigate { model_id, .. }
            | ToolAction::ShowFront { model_id }
            | ToolAction::ShowBack { model_id }
            | ToolAction::ShowRightShoulder { model_id }
            | ToolAction::ShowLeftShoulder { model_id }
            | ToolAction::ShowViewpoint { model_id, .. }
            | ToolAction::ListViewpoints { model_id } => model_id,
        };
        if slot.is_none() {
            *slot = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Explicit target viewpoint id, if this operation carries one.
    pub fn target(&self) -> Option<&str> {
        match self {
            ToolAction::Navigate { target, .. } | ToolAction::ShowViewpoint { target, .. } => {
                target.as_deref()
            }
            _ => None,
        }
    }

    /// Viewpoint-id fragment implied by a directional operation.
    ///
    /// Viewpoint ids encode laterality/orientation more reliably than prose,
    /// so `show_front` resolves by substring over ids rather than by name.
    pub fn direction_fragment(&self) -> Option<&'static str> {
        match self {
            ToolAction::ShowFront { .. } => Some("front"),
            ToolAction::ShowBack { .. } => Some("back"),
            ToolAction::ShowRightShoulder { .. } => Some("right"),
            ToolAction::ShowLeftShoulder { .. } => Some("left"),
            _ => None,
        }
    }
}
