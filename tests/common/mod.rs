pub mod builders;

// Re-export commonly used test utilities
pub use builders::{standard_catalog, ModelBuilder, ViewpointBuilder};
