//! Per-conversation session state and the turn runner.

mod state;
mod turn;

pub use state::{SessionPhase, SessionViewState, VoiceSession};
pub use turn::{run_turn, EventSink, TurnOutcome};
