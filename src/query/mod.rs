//! Utterance analysis: normalization, tokens, and phrase windows.

mod analyzer;

pub use analyzer::{normalize, QueryAnalysis};
