//! Read-only viewpoint catalog, loaded once at startup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::models::{AnatomyModel, Viewpoint};
use crate::SomaviewError;

/// On-disk catalog document shape.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    models: Vec<AnatomyModel>,
}

/// Immutable, process-wide collection of anatomy models.
///
/// Built once from the catalog file and shared freely across sessions
/// without locking. Iteration order is file order; the scorer relies on it
/// as its documented tie-break, so reordering the catalog file is the one
/// legitimate way to change tie outcomes.
#[derive(Debug)]
pub struct Catalog {
    models: Vec<AnatomyModel>,
    model_index: HashMap<String, usize>,
    viewpoint_index: HashMap<(String, String), usize>,
}

impl Catalog {
    /// Load and validate the catalog file.
    ///
    /// Any read, parse, or validation failure is fatal; every other
    /// component depends on the catalog being a total function over ids.
    pub fn load(path: &Path) -> Result<Self, SomaviewError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SomaviewError::CatalogLoad(format!("failed to read {}: {}", path.display(), e))
        })?;
        let file: CatalogFile = serde_json::from_str(&raw).map_err(|e| {
            SomaviewError::CatalogLoad(format!("failed to parse {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_models(file.models)?;
        info!(
            models = catalog.models.len(),
            viewpoints = catalog.viewpoint_index.len(),
            "catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Build a catalog from in-memory models, validating id uniqueness.
    pub fn from_models(models: Vec<AnatomyModel>) -> Result<Self, SomaviewError> {
        let mut model_index = HashMap::new();
        let mut viewpoint_index = HashMap::new();

        for (mi, model) in models.iter().enumerate() {
            if model_index.insert(model.id.clone(), mi).is_some() {
                return Err(SomaviewError::CatalogLoad(format!(
                    "duplicate model id '{}'",
                    model.id
                )));
            }
            let mut seen = HashSet::new();
            for (vi, vp) in model.viewpoints.iter().enumerate() {
                if !seen.insert(vp.id.as_str()) {
                    return Err(SomaviewError::CatalogLoad(format!(
                        "duplicate viewpoint id '{}' in model '{}'",
                        vp.id, model.id
                    )));
                }
                viewpoint_index.insert((model.id.clone(), vp.id.clone()), vi);
            }
        }

        Ok(Self {
            models,
            model_index,
            viewpoint_index,
        })
    }

    /// All models, in catalog file order.
    pub fn models(&self) -> &[AnatomyModel] {
        &self.models
    }

    pub fn model(&self, id: &str) -> Option<&AnatomyModel> {
        self.model_index.get(id).map(|&i| &self.models[i])
    }

    pub fn viewpoint(&self, model_id: &str, viewpoint_id: &str) -> Option<&Viewpoint> {
        let &vi = self
            .viewpoint_index
            .get(&(model_id.to_string(), viewpoint_id.to_string()))?;
        Some(&self.model(model_id)?.viewpoints[vi])
    }

    /// Viewpoints of one model in file order, or absent for an unknown model.
    pub fn viewpoints(&self, model_id: &str) -> Option<&[Viewpoint]> {
        self.model(model_id).map(|m| m.viewpoints.as_slice())
    }

    /// First viewpoint of a model whose id contains the given fragment.
    ///
    /// Backs the directional operations (`show_front` etc.), which resolve
    /// against viewpoint ids rather than display names.
    pub fn viewpoint_with_fragment(&self, model_id: &str, fragment: &str) -> Option<&Viewpoint> {
        self.model(model_id)?
            .viewpoints
            .iter()
            .find(|vp| vp.id.contains(fragment))
    }
}
