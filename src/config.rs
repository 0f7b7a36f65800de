//! Scoring weights and threshold as operator-tunable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::SomaviewError;

/// Weights and threshold for the relevance scorer.
///
/// The defaults are the hand-tuned production values; they have no
/// documented derivation, so they live here as named configuration rather
/// than literals in the algorithm, and can be recalibrated from a TOML file
/// without touching the scoring structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Model-level topic keyword hit.
    pub topic_weight: f64,
    /// Model display name hit.
    pub model_name_weight: f64,
    /// Model description hit.
    pub model_description_weight: f64,
    /// Per-viewpoint context phrase hit, the most specific signal in the
    /// system, hence the highest weight.
    pub view_context_weight: f64,
    /// Viewpoint display name hit.
    pub viewpoint_name_weight: f64,
    /// Viewpoint description hit.
    pub viewpoint_description_weight: f64,
    /// Clinical-context prose hit.
    pub clinical_context_weight: f64,
    /// Each common-use-case phrase hit.
    pub use_case_weight: f64,
    /// Each string leaf flattened out of the anatomyVisible structure.
    pub anatomy_leaf_weight: f64,
    /// "left"/"right" token matching a lateral viewpoint id.
    pub lateral_boost: f64,
    /// "front"/"anterior"/"back"/"posterior" matching an orientation id.
    pub orientation_boost: f64,
    /// "neck" token matching a neck viewpoint id.
    pub neck_boost: f64,
    /// Best scores below this are too weak to act on.
    pub min_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            topic_weight: 4.0,
            model_name_weight: 2.0,
            model_description_weight: 1.0,
            view_context_weight: 6.0,
            viewpoint_name_weight: 4.0,
            viewpoint_description_weight: 2.0,
            clinical_context_weight: 2.0,
            use_case_weight: 1.5,
            anatomy_leaf_weight: 1.5,
            lateral_boost: 3.0,
            orientation_boost: 2.0,
            neck_boost: 1.5,
            min_score: 3.0,
        }
    }
}

impl ScoringConfig {
    /// Read an override file, or fall back to defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SomaviewError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SomaviewError::Validation(format!(
                "failed to read scoring config {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            SomaviewError::Validation(format!(
                "failed to parse scoring config {}: {}",
                path.display(),
                e
            ))
        })?;
        info!("scoring config loaded from {}", path.display());
        Ok(config)
    }
}
