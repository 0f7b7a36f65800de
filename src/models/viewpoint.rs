use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A 3-D point in viewer space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Camera pose: where the camera sits and what it looks at.
///
/// Both points are mandatory: a viewpoint with a partial pose fails catalog
/// load at deserialization time, so downstream code never sees a half-built
/// camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// A named camera pose on one anatomy model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Viewpoint {
    pub id: String,
    pub name: String,
    pub button_label: String,
    pub camera: CameraPose,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub clinical_context: Option<String>,
    #[serde(default)]
    pub common_use_cases: Vec<String>,
    /// Free-form nested structure describing depicted anatomy.
    /// Only string and string-array leaves participate in scoring.
    #[serde(default)]
    pub anatomy_visible: Option<serde_json::Value>,
}
