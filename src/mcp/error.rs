use rmcp::model::{Content, IntoContents};
use serde::Serialize;

use crate::SomaviewError;

/// Structured error response for MCP tool calls.
/// Provides error_code + suggestion so LLMs can auto-fix.
#[derive(Debug, Serialize)]
pub struct ToolError {
    pub error_code: String,
    pub message: String,
    pub suggestion: String,
}

impl IntoContents for ToolError {
    fn into_contents(self) -> Vec<Content> {
        let json = serde_json::to_string(&self).unwrap_or_else(|_| self.message.clone());
        vec![Content::text(json)]
    }
}

impl From<SomaviewError> for ToolError {
    fn from(err: SomaviewError) -> Self {
        match &err {
            SomaviewError::ModelNotFound(_) | SomaviewError::ViewpointNotFound { .. } => {
                ToolError {
                    error_code: "NOT_FOUND".into(),
                    message: err.to_string(),
                    suggestion: "Use list_models or list_viewpoints to see valid ids.".into(),
                }
            }
            SomaviewError::MissingTarget(_) => ToolError {
                error_code: "MISSING_TARGET".into(),
                message: err.to_string(),
                suggestion: "Pass a target viewpoint id, or use suggest_viewpoint first.".into(),
            },
            SomaviewError::UnsupportedOperation(_) => ToolError {
                error_code: "UNSUPPORTED_OPERATION".into(),
                message: err.to_string(),
                suggestion: "Use one of the documented navigation operations.".into(),
            },
            SomaviewError::Validation(_) => ToolError {
                error_code: "INVALID_PARAMS".into(),
                message: err.to_string(),
                suggestion: "Check parameter format and valid values.".into(),
            },
            SomaviewError::CatalogLoad(_) => ToolError {
                error_code: "INTERNAL_ERROR".into(),
                message: err.to_string(),
                suggestion: "The catalog failed to load; restart the server.".into(),
            },
        }
    }
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        ToolError {
            error_code: "INTERNAL_ERROR".into(),
            message,
            suggestion: "Retry the operation or simplify the request.".into(),
        }
    }
}
