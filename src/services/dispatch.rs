//! Viewer-update dedup and camera command construction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{ToolAction, Vec3};
use crate::services::resolver::{effective_ids, Resolution};
use crate::session::SessionViewState;

/// Camera motions are animated flights by default.
pub const CAMERA_ANIMATE: bool = true;
pub const CAMERA_DURATION_MS: u64 = 1500;

/// Camera motion kind on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CameraOp {
    /// Jump immediately to the pose.
    Set,
    /// Animate to the pose.
    FlyTo,
}

/// Camera-motion command for the rendering surface.
///
/// Position and target pass through from the viewpoint's pose untouched;
/// no transform, no precision loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CameraCommand {
    pub op: CameraOp,
    pub position: Vec3,
    pub target: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub animate: bool,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

/// Viewer-update event telling the rendering surface what to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewerUpdate {
    pub model_id: String,
    pub model_name: String,
    pub model_url: String,
    pub viewpoint_id: String,
    pub viewpoint_name: String,
    /// True when the scorer, not the language model, chose this viewpoint.
    pub auto_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub matched_terms: Vec<String>,
}

/// Everything one non-redundant turn emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    pub viewer_update: ViewerUpdate,
    pub camera: CameraCommand,
}

/// Resolve a turn to concrete catalog entries and build its events, unless
/// the turn is redundant.
///
/// Silent-no-op cases, all recoverable by design: no effective ids, ids the
/// catalog does not know, or a pair identical to the session's last
/// dispatch. The conversational response is unaffected either way.
pub fn maybe_dispatch(
    catalog: &Catalog,
    resolution: &Resolution,
    state: &mut SessionViewState,
) -> Option<Dispatch> {
    let (model_id, viewpoint_id) = effective_ids(
        catalog,
        resolution.action.as_ref(),
        resolution.suggestion.as_ref(),
        resolution.current_model.as_deref(),
    );
    let (model_id, viewpoint_id) = (model_id?, viewpoint_id?);

    let Some(model) = catalog.model(&model_id) else {
        debug!(model = %model_id, "resolved model not in catalog, skipping dispatch");
        return None;
    };
    let Some(viewpoint) = catalog.viewpoint(&model_id, &viewpoint_id) else {
        debug!(
            model = %model_id,
            viewpoint = %viewpoint_id,
            "resolved viewpoint not in catalog, skipping dispatch"
        );
        return None;
    };

    if state.is_current(&model_id, &viewpoint_id) {
        debug!(
            model = %model_id,
            viewpoint = %viewpoint_id,
            "viewpoint unchanged, suppressing redundant update"
        );
        return None;
    }

    let (auto_selected, matched_terms, reason) = match &resolution.action {
        Some(ToolAction::Navigate {
            auto_selected,
            matched_terms,
            reason,
            ..
        }) => (*auto_selected, matched_terms.clone(), reason.clone()),
        _ => (
            false,
            resolution
                .suggestion
                .as_ref()
                .map(|s| s.matched_terms.clone())
                .unwrap_or_default(),
            resolution.suggestion.as_ref().map(|s| s.reason.clone()),
        ),
    };

    let dispatch = Dispatch {
        viewer_update: ViewerUpdate {
            model_id: model.id.clone(),
            model_name: model.name.clone(),
            model_url: model.model_url.clone(),
            viewpoint_id: viewpoint.id.clone(),
            viewpoint_name: viewpoint.name.clone(),
            auto_selected,
            reason,
            matched_terms,
        },
        camera: CameraCommand {
            op: CameraOp::FlyTo,
            position: viewpoint.camera.position,
            target: viewpoint.camera.target,
            object_id: Some(model.id.clone()),
            animate: CAMERA_ANIMATE,
            duration_ms: CAMERA_DURATION_MS,
        },
    };

    state.advance(&model_id, &viewpoint_id);
    Some(dispatch)
}
