//! Catalog data model and navigation commands.

pub mod action;
pub mod anatomy;
pub mod viewpoint;

pub use action::ToolAction;
pub use anatomy::{AiContext, AnatomyModel};
pub use viewpoint::{CameraPose, Vec3, Viewpoint};
