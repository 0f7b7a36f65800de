use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Last (model, viewpoint) pair actually dispatched for one session.
///
/// Owned exclusively by its session; mutated only after a successful
/// dispatch. Never shared across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionViewState {
    pub model_id: Option<String>,
    pub viewpoint_id: Option<String>,
}

impl SessionViewState {
    pub fn is_current(&self, model_id: &str, viewpoint_id: &str) -> bool {
        self.model_id.as_deref() == Some(model_id)
            && self.viewpoint_id.as_deref() == Some(viewpoint_id)
    }

    pub fn advance(&mut self, model_id: &str, viewpoint_id: &str) {
        self.model_id = Some(model_id.to_string());
        self.viewpoint_id = Some(viewpoint_id.to_string());
    }
}

/// Lifecycle of a conversational session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Created but not started.
    Idle,
    /// Taking turns; owns live view state.
    Active,
    /// Explicitly stopped or transport lost; view state discarded.
    Stopped,
}

/// Per-conversation state for the turn pipeline.
///
/// One session processes utterances strictly in the order they become
/// final; there is no parallel execution of turns within a session.
#[derive(Debug, Clone)]
pub struct VoiceSession {
    id: Uuid,
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
    view_state: SessionViewState,
    /// The session's default model for ambiguous turns, explicitly scoped
    /// here instead of living in process-wide state.
    current_model: Option<String>,
}

impl Default for VoiceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            started_at: None,
            view_state: SessionViewState::default(),
            current_model: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Begin taking turns. Starting an already-stopped session restarts it
    /// with fresh state.
    pub fn start(&mut self) {
        self.phase = SessionPhase::Active;
        self.started_at = Some(Utc::now());
        self.view_state = SessionViewState::default();
        self.current_model = None;
    }

    /// Stop and discard view state. Idempotent.
    pub fn stop(&mut self) {
        self.phase = SessionPhase::Stopped;
        self.view_state = SessionViewState::default();
        self.current_model = None;
    }

    pub fn view_state(&self) -> &SessionViewState {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut SessionViewState {
        &mut self.view_state
    }

    pub fn current_model(&self) -> Option<&str> {
        self.current_model.as_deref()
    }

    pub fn set_current_model(&mut self, model_id: Option<String>) {
        self.current_model = model_id;
    }
}
