use std::sync::Arc;

use rmcp::{
    handler::server::tool::ToolRouter,
    handler::server::wrapper::{Json, Parameters},
    model::*,
    tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::init::AppContext;
use crate::mcp::error::ToolError;
use crate::mcp::types::{
    ExecuteRequest, ListModelsRequest, ListModelsResponse, ListViewpointsRequest,
    ListViewpointsResponse, ModelSummary, SessionRequest, SessionResponse, SuggestRequest,
    SuggestResponse, SuggestionResponse, ToolOutcome, TurnResponse, UtteranceRequest,
    ViewpointSummary,
};
use crate::models::ToolAction;
use crate::services::{
    self, effective_ids, maybe_dispatch, CameraCommand, Resolution, ViewerUpdate,
};
use crate::session::{run_turn, EventSink, VoiceSession};
use crate::SomaviewError;

/// Sink for turns whose events travel back inside the tool response
/// instead of over a live transport.
struct ResponseSink;

#[async_trait::async_trait]
impl EventSink for ResponseSink {
    async fn viewer_update(&self, _update: &ViewerUpdate) {}
    async fn camera_command(&self, _command: &CameraCommand) {}
}

/// MCP server over the viewpoint catalog and turn pipeline.
///
/// One conversational session per server instance; the catalog is shared
/// and read-only.
#[derive(Clone)]
pub struct SomaviewServer {
    ctx: Arc<AppContext>,
    session: Arc<RwLock<VoiceSession>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SomaviewServer {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            session: Arc::new(RwLock::new(VoiceSession::new())),
            tool_router: Self::tool_router(),
        }
    }

    /// Run one recognized operation against the session.
    async fn handle_execute(&self, action: ToolAction) -> ToolOutcome {
        if let ToolAction::ListViewpoints { model_id } = &action {
            return self.describe_viewpoints(model_id.as_deref()).await;
        }

        // navigate and show_viewpoint require an explicit target.
        if matches!(
            &action,
            ToolAction::Navigate { target: None, .. }
                | ToolAction::ShowViewpoint { target: None, .. }
        ) {
            return ToolOutcome::failed(
                SomaviewError::MissingTarget(action.op_name().to_string()).to_string(),
            );
        }

        let mut session = self.session.write().await;
        // Direct tool calls count as the start signal for an idle session.
        if !session.is_active() {
            session.start();
        }

        let (model_id, viewpoint_id) =
            effective_ids(&self.ctx.catalog, Some(&action), None, session.current_model());
        let Some(model_id) = model_id else {
            return ToolOutcome::failed("No model in scope; pass model_id or navigate first.");
        };
        let Some(viewpoint_id) = viewpoint_id else {
            return ToolOutcome::failed(format!(
                "No viewpoint matching '{}' on model '{}'",
                action.direction_fragment().unwrap_or("?"),
                model_id
            ));
        };

        if self.ctx.catalog.model(&model_id).is_none() {
            return ToolOutcome::failed(SomaviewError::ModelNotFound(model_id).to_string());
        }
        let Some(viewpoint) = self.ctx.catalog.viewpoint(&model_id, &viewpoint_id) else {
            return ToolOutcome::failed(
                SomaviewError::ViewpointNotFound {
                    model_id,
                    viewpoint_id,
                }
                .to_string(),
            );
        };
        let viewpoint_name = viewpoint.name.clone();

        let resolution = Resolution {
            action: Some(action),
            suggestion: None,
            applied: true,
            auto_filled: false,
            current_model: Some(model_id.clone()),
        };
        session.set_current_model(Some(model_id.clone()));

        match maybe_dispatch(&self.ctx.catalog, &resolution, session.view_state_mut()) {
            Some(dispatch) => ToolOutcome::ok(
                format!("Moved to {}", viewpoint_name),
                Some(dispatch.camera),
            ),
            None => ToolOutcome::ok(format!("Already showing {}", viewpoint_name), None),
        }
    }

    async fn describe_viewpoints(&self, model_id: Option<&str>) -> ToolOutcome {
        let session = self.session.read().await;
        let model_id = model_id.or(session.current_model());
        let Some(model_id) = model_id else {
            return ToolOutcome::failed("No model in scope; pass model_id.");
        };
        match self.ctx.catalog.viewpoints(model_id) {
            Some(viewpoints) => {
                let names: Vec<&str> = viewpoints.iter().map(|vp| vp.name.as_str()).collect();
                ToolOutcome::ok(
                    format!("Viewpoints on {}: {}", model_id, names.join(", ")),
                    None,
                )
            }
            None => {
                ToolOutcome::failed(SomaviewError::ModelNotFound(model_id.to_string()).to_string())
            }
        }
    }

    // ==========================================================================
    // MCP TOOLS
    // ==========================================================================

    #[tool(
        description = "Execute one navigation operation against the 3D viewer: navigate, show_front, show_back, show_right_shoulder, show_left_shoulder, show_viewpoint, or list_viewpoints. Starts the session if needed. Returns {success, message, data?} where data carries the camera command."
    )]
    #[instrument(name = "mcp.execute", skip_all)]
    pub async fn execute(
        &self,
        request: Parameters<ExecuteRequest>,
    ) -> Result<Json<ToolOutcome>, ToolError> {
        let Parameters(input) = request;
        Ok(Json(self.handle_execute(input.action).await))
    }

    #[tool(
        description = "Process one finalized utterance: score it against the catalog, merge with the language model's command if given, and return the viewer update and camera command when the view actually changes. Requires an active session (start_session)."
    )]
    #[instrument(name = "mcp.process_utterance", skip_all)]
    pub async fn process_utterance(
        &self,
        request: Parameters<UtteranceRequest>,
    ) -> Result<Json<TurnResponse>, ToolError> {
        let Parameters(input) = request;
        let mut session = self.session.write().await;

        let outcome = run_turn(
            &mut session,
            &self.ctx.catalog,
            &self.ctx.scoring,
            &input.utterance,
            input.action,
            &ResponseSink,
        )
        .await;

        let (viewer_update, camera) = match outcome.dispatch {
            Some(d) => (Some(d.viewer_update), Some(d.camera)),
            None => (None, None),
        };
        Ok(Json(TurnResponse {
            applied: outcome.resolution.applied,
            viewer_update,
            camera,
            suggestion: outcome
                .resolution
                .suggestion
                .map(SuggestionResponse::from),
        }))
    }

    #[tool(
        description = "Ask the relevance scorer which viewpoint best matches a free-form query, without moving the camera. Returns nothing when no viewpoint clears the minimum score."
    )]
    #[instrument(name = "mcp.suggest_viewpoint", skip_all)]
    pub async fn suggest_viewpoint(
        &self,
        request: Parameters<SuggestRequest>,
    ) -> Result<Json<SuggestResponse>, ToolError> {
        let Parameters(input) = request;
        let suggestion = services::suggest(&self.ctx.catalog, &input.query, &self.ctx.scoring);
        Ok(Json(SuggestResponse {
            suggestion: suggestion.map(SuggestionResponse::from),
        }))
    }

    #[tool(description = "List all anatomy models in the catalog.")]
    #[instrument(name = "mcp.list_models", skip_all)]
    pub async fn list_models(
        &self,
        _request: Parameters<ListModelsRequest>,
    ) -> Result<Json<ListModelsResponse>, ToolError> {
        let models = self
            .ctx
            .catalog
            .models()
            .iter()
            .map(|m| ModelSummary {
                id: m.id.clone(),
                name: m.name.clone(),
                description: m.description.clone(),
                viewpoint_count: m.viewpoints.len(),
            })
            .collect();
        Ok(Json(ListModelsResponse { models }))
    }

    #[tool(
        description = "List the viewpoints of a model (defaults to the session's current model)."
    )]
    #[instrument(name = "mcp.list_viewpoints", skip_all)]
    pub async fn list_viewpoints(
        &self,
        request: Parameters<ListViewpointsRequest>,
    ) -> Result<Json<ListViewpointsResponse>, ToolError> {
        let Parameters(input) = request;
        let session = self.session.read().await;
        let model_id = input
            .model_id
            .or_else(|| session.current_model().map(String::from))
            .ok_or_else(|| {
                ToolError::from(SomaviewError::Validation(
                    "no model in scope; pass model_id".to_string(),
                ))
            })?;

        let viewpoints = self
            .ctx
            .catalog
            .viewpoints(&model_id)
            .ok_or_else(|| ToolError::from(SomaviewError::ModelNotFound(model_id.clone())))?;

        Ok(Json(ListViewpointsResponse {
            model_id,
            viewpoints: viewpoints
                .iter()
                .map(|vp| ViewpointSummary {
                    id: vp.id.clone(),
                    name: vp.name.clone(),
                    button_label: vp.button_label.clone(),
                    description: vp.description.clone(),
                })
                .collect(),
        }))
    }

    #[tool(description = "Start (or restart) the conversational session with fresh view state.")]
    #[instrument(name = "mcp.start_session", skip_all)]
    pub async fn start_session(
        &self,
        _request: Parameters<SessionRequest>,
    ) -> Result<Json<SessionResponse>, ToolError> {
        let mut session = self.session.write().await;
        session.start();
        Ok(Json(session_response(&session)))
    }

    #[tool(description = "Stop the session and discard its view state.")]
    #[instrument(name = "mcp.stop_session", skip_all)]
    pub async fn stop_session(
        &self,
        _request: Parameters<SessionRequest>,
    ) -> Result<Json<SessionResponse>, ToolError> {
        let mut session = self.session.write().await;
        session.stop();
        Ok(Json(session_response(&session)))
    }
}

fn session_response(session: &VoiceSession) -> SessionResponse {
    SessionResponse {
        session_id: session.id().to_string(),
        phase: format!("{:?}", session.phase()).to_lowercase(),
        current_model: session.current_model().map(String::from),
        viewpoint_id: session.view_state().viewpoint_id.clone(),
    }
}

#[tool_handler]
impl ServerHandler for SomaviewServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "somaview".to_string(),
                title: Some("Somaview Anatomy Navigator".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"# Somaview Anatomy Navigator

Resolves free-form utterances to camera viewpoints on 3D anatomy models.

## Tools
- process_utterance: Main entry: one finalized utterance (plus your own
  structured command, if any). The scorer proposes a viewpoint, the resolver
  merges it with your command, and the viewer update + camera command come
  back when the view actually changed.
- execute: Run a single operation directly: navigate, show_front,
  show_back, show_right_shoulder, show_left_shoulder, show_viewpoint,
  list_viewpoints.
- suggest_viewpoint: Dry-run the scorer for a query.
- list_models / list_viewpoints: Catalog inspection.
- start_session / stop_session: Session lifecycle. process_utterance only
  dispatches while the session is active.

## Key Patterns
- Repeating the current viewpoint is a no-op by design (no duplicate
  viewer updates).
- Explicit fields in your command are never overwritten; the scorer only
  fills gaps.
- Unknown model/viewpoint ids fail softly: {success:false, message}.
"#
                .to_string(),
            ),
        }
    }
}

/// Serve the MCP server over stdio until the peer disconnects.
pub async fn run_mcp_server(ctx: AppContext) -> anyhow::Result<()> {
    let server = SomaviewServer::new(Arc::new(ctx));

    tracing::info!("Starting Somaview MCP server v{}", env!("CARGO_PKG_VERSION"));

    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;
    tracing::info!("MCP server listening on stdio");

    tokio::spawn(async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
    });

    service.waiting().await?;
    tracing::info!("MCP server shutting down");
    Ok(())
}
