//! Test data builders for catalog construction.
//!
//! Provides fluent API for creating test models/viewpoints with sensible
//! defaults.

use std::collections::HashMap;

use somaview::catalog::Catalog;
use somaview::models::{AiContext, AnatomyModel, CameraPose, Vec3, Viewpoint};

/// Builder for creating test viewpoints.
pub struct ViewpointBuilder {
    id: String,
    name: String,
    camera: CameraPose,
    description: Option<String>,
    clinical_context: Option<String>,
    common_use_cases: Vec<String>,
    anatomy_visible: Option<serde_json::Value>,
}

impl ViewpointBuilder {
    /// Create a new viewpoint builder with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            camera: CameraPose {
                position: Vec3 {
                    x: 0.0,
                    y: 1.0,
                    z: 3.0,
                },
                target: Vec3 {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            },
            description: None,
            clinical_context: None,
            common_use_cases: Vec::new(),
            anatomy_visible: None,
        }
    }

    pub fn camera(mut self, position: (f64, f64, f64), target: (f64, f64, f64)) -> Self {
        self.camera = CameraPose {
            position: Vec3 {
                x: position.0,
                y: position.1,
                z: position.2,
            },
            target: Vec3 {
                x: target.0,
                y: target.1,
                z: target.2,
            },
        };
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn clinical_context(mut self, text: impl Into<String>) -> Self {
        self.clinical_context = Some(text.into());
        self
    }

    pub fn use_case(mut self, text: impl Into<String>) -> Self {
        self.common_use_cases.push(text.into());
        self
    }

    pub fn anatomy_visible(mut self, value: serde_json::Value) -> Self {
        self.anatomy_visible = Some(value);
        self
    }

    pub fn build(self) -> Viewpoint {
        Viewpoint {
            button_label: self.name.clone(),
            id: self.id,
            name: self.name,
            camera: self.camera,
            description: self.description,
            clinical_context: self.clinical_context,
            common_use_cases: self.common_use_cases,
            anatomy_visible: self.anatomy_visible,
        }
    }
}

/// Builder for creating test models.
pub struct ModelBuilder {
    id: String,
    name: String,
    description: String,
    viewpoints: Vec<Viewpoint>,
    topics: Vec<String>,
    view_contexts: HashMap<String, Vec<String>>,
}

impl ModelBuilder {
    /// Create a new model builder with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            viewpoints: Vec::new(),
            topics: Vec::new(),
            view_contexts: HashMap::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn viewpoint(mut self, viewpoint: Viewpoint) -> Self {
        self.viewpoints.push(viewpoint);
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    pub fn view_context(
        mut self,
        viewpoint_id: impl Into<String>,
        phrase: impl Into<String>,
    ) -> Self {
        self.view_contexts
            .entry(viewpoint_id.into())
            .or_default()
            .push(phrase.into());
        self
    }

    pub fn build(self) -> AnatomyModel {
        let ai_context = if self.topics.is_empty() && self.view_contexts.is_empty() {
            None
        } else {
            Some(AiContext {
                topics: self.topics,
                view_contexts: self.view_contexts,
            })
        };
        AnatomyModel {
            model_url: format!("https://assets.example/{}.glb", self.id),
            id: self.id,
            name: self.name,
            description: self.description,
            viewpoints: self.viewpoints,
            ai_context,
        }
    }
}

/// A two-model catalog exercising names, topics, contexts, and laterality.
pub fn standard_catalog() -> Catalog {
    Catalog::from_models(vec![
        ModelBuilder::new("shoulder", "Shoulder Complex")
            .description("Glenohumeral joint and rotator cuff")
            .topic("shoulder")
            .topic("rotator cuff")
            .view_context("right_shoulder", "right shoulder pain")
            .viewpoint(
                ViewpointBuilder::new("front_view", "Front View")
                    .camera((0.0, 0.0, 4.0), (0.0, 0.0, 0.0))
                    .build(),
            )
            .viewpoint(
                ViewpointBuilder::new("right_shoulder", "Right Shoulder View")
                    .camera((1.25, 0.75, 3.5), (0.1, 0.2, 0.3))
                    .use_case("rotator cuff tear")
                    .build(),
            )
            .viewpoint(
                ViewpointBuilder::new("left_shoulder", "Left Shoulder View")
                    .camera((-1.25, 0.75, 3.5), (-0.1, 0.2, 0.3))
                    .build(),
            )
            .build(),
        ModelBuilder::new("cervical_spine", "Cervical Spine")
            .description("Vertebrae C1 through C7")
            .topic("neck")
            .viewpoint(
                ViewpointBuilder::new("neck_lateral", "Lateral Neck View")
                    .camera((2.0, 1.5, 0.0), (0.0, 1.5, 0.0))
                    .clinical_context("whiplash and cervical radiculopathy")
                    .build(),
            )
            .build(),
    ])
    .unwrap()
}
