use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::viewpoint::Viewpoint;

/// Semantic hints attached to a model for relevance scoring.
///
/// `topics` are model-level keywords; `view_contexts` maps a viewpoint id to
/// the phrases most specific to that viewpoint (the strongest signal the
/// scorer has).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiContext {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub view_contexts: HashMap<String, Vec<String>>,
}

/// An anatomical model with its named viewpoints.
///
/// Viewpoints keep catalog file order; that order is the scorer's documented
/// tie-break, so it is deliberate, not incidental.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnatomyModel {
    pub id: String,
    pub name: String,
    /// URL of the external 3D rendering asset.
    pub model_url: String,
    #[serde(default)]
    pub description: String,
    pub viewpoints: Vec<Viewpoint>,
    #[serde(default)]
    pub ai_context: Option<AiContext>,
}

impl AnatomyModel {
    /// Context phrases configured for one of this model's viewpoints.
    pub fn view_context(&self, viewpoint_id: &str) -> &[String] {
        self.ai_context
            .as_ref()
            .and_then(|ctx| ctx.view_contexts.get(viewpoint_id))
            .map(|phrases| phrases.as_slice())
            .unwrap_or(&[])
    }

    /// Model-level topic keywords, empty when no context is configured.
    pub fn topics(&self) -> &[String] {
        self.ai_context
            .as_ref()
            .map(|ctx| ctx.topics.as_slice())
            .unwrap_or(&[])
    }
}
