use async_trait::async_trait;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::models::ToolAction;
use crate::services::{maybe_dispatch, resolve, CameraCommand, Dispatch, Resolution, ViewerUpdate};
use crate::session::VoiceSession;

/// Outbound channel to the session's transport layer.
///
/// Implementations forward to whatever carries events to the rendering
/// surface (WebSocket, test buffer, ...). The pipeline never blocks on it
/// beyond the await itself.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn viewer_update(&self, update: &ViewerUpdate);
    async fn camera_command(&self, command: &CameraCommand);
}

/// What one utterance produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub resolution: Resolution,
    /// Present only when a non-redundant viewer update was emitted.
    pub dispatch: Option<Dispatch>,
}

/// Run the full pipeline for one final utterance.
///
/// Score → resolve → dispatch, exactly once, in arrival order. A session
/// that is not active resolves nothing onward: emitting to a dead session
/// is a silent no-op, never an error.
pub async fn run_turn(
    session: &mut VoiceSession,
    catalog: &Catalog,
    config: &ScoringConfig,
    utterance: &str,
    llm_action: Option<ToolAction>,
    sink: &dyn EventSink,
) -> TurnOutcome {
    let resolution = resolve(
        catalog,
        config,
        utterance,
        llm_action,
        session.current_model(),
    );

    if !session.is_active() {
        debug!(session = %session.id(), "session not active, dropping dispatch");
        return TurnOutcome {
            resolution,
            dispatch: None,
        };
    }

    session.set_current_model(resolution.current_model.clone());
    let dispatch = maybe_dispatch(catalog, &resolution, session.view_state_mut());

    if let Some(dispatch) = &dispatch {
        sink.viewer_update(&dispatch.viewer_update).await;
        sink.camera_command(&dispatch.camera).await;
    }

    TurnOutcome {
        resolution,
        dispatch,
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::models::{AnatomyModel, CameraPose, Vec3, Viewpoint};

    #[derive(Default)]
    struct RecordingSink {
        updates: Mutex<Vec<ViewerUpdate>>,
        commands: Mutex<Vec<CameraCommand>>,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn viewer_update(&self, update: &ViewerUpdate) {
            self.updates.lock().await.push(update.clone());
        }

        async fn camera_command(&self, command: &CameraCommand) {
            self.commands.lock().await.push(command.clone());
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_models(vec![AnatomyModel {
            id: "shoulder".to_string(),
            name: "Shoulder Complex".to_string(),
            model_url: "https://assets.example/shoulder.glb".to_string(),
            description: String::new(),
            viewpoints: vec![Viewpoint {
                id: "right_shoulder".to_string(),
                name: "Right Shoulder View".to_string(),
                button_label: "Right".to_string(),
                camera: CameraPose {
                    position: Vec3 {
                        x: 1.0,
                        y: 0.5,
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
            }],
            ai_context: None,
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn active_session_emits_both_events_once() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let sink = RecordingSink::default();
        let mut session = VoiceSession::new();
        session.start();

        let outcome = run_turn(
            &mut session,
            &catalog,
            &config,
            "show right shoulder",
            None,
            &sink,
        )
        .await;

        assert!(outcome.dispatch.is_some());
        assert_eq!(sink.updates.lock().await.len(), 1);
        assert_eq!(sink.commands.lock().await.len(), 1);
        assert_eq!(session.current_model(), Some("shoulder"));

        // Second identical turn is suppressed by the view state.
        let outcome = run_turn(
            &mut session,
            &catalog,
            &config,
            "right shoulder please",
            None,
            &sink,
        )
        .await;
        assert!(outcome.dispatch.is_none());
        assert_eq!(sink.updates.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn stopped_session_emits_nothing() {
        let catalog = catalog();
        let config = ScoringConfig::default();
        let sink = RecordingSink::default();
        let mut session = VoiceSession::new();
        session.start();
        session.stop();

        let outcome = run_turn(
            &mut session,
            &catalog,
            &config,
            "show right shoulder",
            None,
            &sink,
        )
        .await;

        assert!(outcome.dispatch.is_none());
        assert!(sink.updates.lock().await.is_empty());
        assert!(sink.commands.lock().await.is_empty());
        assert_eq!(session.current_model(), None);
    }
}
