use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::ToolAction;
use crate::services::{CameraCommand, MatchSuggestion, ViewerUpdate};

/// Result envelope for navigation operations.
///
/// Failures are carried here as `success: false` with a message, never
/// thrown across a turn boundary; `data` holds the camera command on a
/// successful move.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CameraCommand>,
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>, data: Option<CameraCommand>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Execute one recognized navigation operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteRequest {
    /// The operation to run, tagged by `op` (navigate, show_front,
    /// show_back, show_right_shoulder, show_left_shoulder, show_viewpoint,
    /// list_viewpoints).
    pub action: ToolAction,
}

/// One finalized utterance, with the language model's structured command
/// for the same turn when it produced one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UtteranceRequest {
    pub utterance: String,
    #[serde(default)]
    pub action: Option<ToolAction>,
}

/// What one turn produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TurnResponse {
    /// Whether the merge counted as a navigation event.
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_update: Option<ViewerUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<SuggestionResponse>,
}

/// Ask the relevance scorer directly, without navigating.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionResponse {
    pub model_id: String,
    pub model_name: String,
    pub viewpoint_id: String,
    pub viewpoint_name: String,
    pub score: f64,
    pub matched_terms: Vec<String>,
    pub reason: String,
}

impl From<MatchSuggestion> for SuggestionResponse {
    fn from(s: MatchSuggestion) -> Self {
        Self {
            model_id: s.model_id,
            model_name: s.model_name,
            viewpoint_id: s.viewpoint_id,
            viewpoint_name: s.viewpoint_name,
            score: s.score,
            matched_terms: s.matched_terms,
            reason: s.reason,
        }
    }
}

/// The scorer's answer, or an explicit miss.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<SuggestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListModelsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub viewpoint_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListModelsResponse {
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListViewpointsRequest {
    /// Model to list; defaults to the session's current model.
    #[serde(default)]
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViewpointSummary {
    pub id: String,
    pub name: String,
    pub button_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListViewpointsResponse {
    pub model_id: String,
    pub viewpoints: Vec<ViewpointSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionResponse {
    pub session_id: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewpoint_id: Option<String>,
}
