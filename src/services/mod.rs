//! The per-turn pipeline: score, resolve, dispatch.
//!
//! Everything in here is pure and in-memory; the surrounding session loop
//! owns all I/O and awaiting.

pub mod dispatch;
pub mod resolver;
pub mod scorer;

pub use dispatch::{maybe_dispatch, CameraCommand, CameraOp, Dispatch, ViewerUpdate};
pub use resolver::{effective_ids, resolve, Resolution};
pub use scorer::{suggest, MatchSuggestion};
