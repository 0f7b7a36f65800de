use thiserror::Error;

/// Custom error type for Somaview operations.
#[derive(Debug, Error)]
pub enum SomaviewError {
    /// Catalog file could not be read or parsed. Fatal: the process must not
    /// start without a usable catalog.
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// Requested anatomy model was not found in the catalog.
    #[error("Model not found: '{0}'")]
    ModelNotFound(String),

    /// Requested viewpoint was not found on the given model.
    #[error("Viewpoint not found: '{viewpoint_id}' on model '{model_id}'")]
    ViewpointNotFound {
        model_id: String,
        viewpoint_id: String,
    },

    /// Tool action carries an operation this core does not recognize.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Tool action requires a target viewpoint but none was supplied.
    #[error("Missing target for operation '{0}'")]
    MissingTarget(String),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for SomaviewError {
    fn from(err: serde_json::Error) -> Self {
        SomaviewError::CatalogLoad(format!("JSON parse error: {}", err))
    }
}

impl From<std::io::Error> for SomaviewError {
    fn from(err: std::io::Error) -> Self {
        SomaviewError::CatalogLoad(format!("I/O error: {}", err))
    }
}
