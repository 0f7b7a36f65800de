//! Shared initialization logic for MCP and CLI modes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::config::ScoringConfig;

/// Application context shared between the MCP server and CLI commands.
///
/// The catalog is loaded once and read-only thereafter; it may be shared
/// freely across sessions without locking.
pub struct AppContext {
    pub catalog: Arc<Catalog>,
    pub scoring: ScoringConfig,
}

impl AppContext {
    /// Initialize from the resolved catalog path and optional scoring
    /// overrides. A missing or broken catalog is fatal.
    ///
    /// Catalog path priority: explicit path > SOMAVIEW_CATALOG env >
    /// ./catalog.json (if it exists) > ~/.somaview/catalog.json
    pub fn new(catalog_path: Option<PathBuf>, scoring_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_catalog_path(catalog_path)?;
        let catalog =
            Catalog::load(&path).with_context(|| format!("loading catalog {}", path.display()))?;
        let scoring = ScoringConfig::load_or_default(scoring_path.as_deref())
            .context("loading scoring config")?;

        Ok(Self {
            catalog: Arc::new(catalog),
            scoring,
        })
    }
}

fn resolve_catalog_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(|| std::env::var("SOMAVIEW_CATALOG").ok().map(PathBuf::from))
        .or_else(|| {
            let local = Path::new("catalog.json");
            if local.exists() {
                Some(local.to_path_buf())
            } else {
                None
            }
        })
        .or_else(|| dirs::home_dir().map(|home| home.join(".somaview").join("catalog.json")))
        .context("could not determine a catalog path; pass --catalog or set SOMAVIEW_CATALOG")
}
