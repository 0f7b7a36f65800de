//! CLI interface for Somaview.

pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::init::AppContext;
use crate::models::ToolAction;
use crate::services;
use crate::session::{run_turn, EventSink, VoiceSession};
use output::{
    output_json, print_error, print_hint, print_kv, print_success, print_table, OutputMode,
};

/// Somaview - voice navigation core for 3D anatomy viewers
#[derive(Parser)]
#[command(name = "somaview", version, about, long_about = None)]
pub struct Cli {
    /// Catalog file (default: ./catalog.json, then ~/.somaview/catalog.json)
    #[arg(long, env = "SOMAVIEW_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// TOML file overriding scoring weights and threshold
    #[arg(long, global = true)]
    pub scoring: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start MCP server (stdio transport)
    Mcp,

    /// Score a query against the catalog and show the best viewpoint
    Suggest {
        /// The utterance to analyze
        query: String,
    },

    /// Run one full turn: score, merge with an optional action, dispatch
    Resolve {
        /// The utterance to resolve
        query: String,
        /// Language-model action as JSON, e.g. '{"op":"show_front"}'
        #[arg(long)]
        action: Option<String>,
        /// Session's current model id, for ambiguous turns
        #[arg(long)]
        model: Option<String>,
    },

    /// List catalog models
    Models,

    /// List viewpoints of one model
    Viewpoints {
        /// Model id
        model_id: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        shell: clap_complete::Shell,
    },
}

/// Sink that prints emitted events; the CLI stands in for the transport.
struct StdoutSink {
    mode: OutputMode,
}

#[async_trait::async_trait]
impl EventSink for StdoutSink {
    async fn viewer_update(&self, update: &services::ViewerUpdate) {
        match self.mode {
            OutputMode::Json => output_json(update),
            OutputMode::Human => {
                print_success(&format!(
                    "viewer-update: {} / {}{}",
                    update.model_name,
                    update.viewpoint_name,
                    if update.auto_selected {
                        " (auto-selected)"
                    } else {
                        ""
                    }
                ));
                if let Some(reason) = &update.reason {
                    print_hint(reason);
                }
            }
        }
    }

    async fn camera_command(&self, command: &services::CameraCommand) {
        match self.mode {
            OutputMode::Json => output_json(command),
            OutputMode::Human => {
                print_kv(
                    "camera",
                    &format!(
                        "pos ({:.2}, {:.2}, {:.2}) target ({:.2}, {:.2}, {:.2}) over {}ms",
                        command.position.x,
                        command.position.y,
                        command.position.z,
                        command.target.x,
                        command.target.y,
                        command.target.z,
                        command.duration_ms
                    ),
                );
            }
        }
    }
}

pub async fn execute(command: &Commands, ctx: &AppContext, mode: OutputMode) -> Result<()> {
    match command {
        Commands::Mcp => unreachable!("handled in main"),

        Commands::Suggest { query } => {
            match services::suggest(&ctx.catalog, query, &ctx.scoring) {
                Some(suggestion) => match mode {
                    OutputMode::Json => output_json(&suggestion),
                    OutputMode::Human => {
                        print_success(&format!(
                            "{} / {} (score {:.1})",
                            suggestion.model_name, suggestion.viewpoint_name, suggestion.score
                        ));
                        print_kv("model", &suggestion.model_id);
                        print_kv("viewpoint", &suggestion.viewpoint_id);
                        print_kv("matched", &suggestion.matched_terms.join(", "));
                        print_hint(&suggestion.reason);
                    }
                },
                None => match mode {
                    OutputMode::Json => output_json(&serde_json::json!({ "suggestion": null })),
                    OutputMode::Human => print_hint("No viewpoint cleared the minimum score."),
                },
            }
            Ok(())
        }

        Commands::Resolve {
            query,
            action,
            model,
        } => {
            let llm_action: Option<ToolAction> = match action {
                Some(raw) => Some(serde_json::from_str(raw)?),
                None => None,
            };

            let mut session = VoiceSession::new();
            session.start();
            session.set_current_model(model.clone());

            let sink = StdoutSink { mode };
            let outcome = run_turn(
                &mut session,
                &ctx.catalog,
                &ctx.scoring,
                query,
                llm_action,
                &sink,
            )
            .await;

            if outcome.dispatch.is_none() {
                match mode {
                    OutputMode::Json => output_json(&serde_json::json!({
                        "applied": outcome.resolution.applied,
                        "dispatched": false,
                    })),
                    OutputMode::Human => {
                        print_hint("Nothing dispatched (no match, unknown ids, or unchanged view).")
                    }
                }
            }
            Ok(())
        }

        Commands::Models => {
            match mode {
                OutputMode::Json => output_json(&ctx.catalog.models()),
                OutputMode::Human => print_table(
                    &["id", "name", "viewpoints", "description"],
                    ctx.catalog
                        .models()
                        .iter()
                        .map(|m| {
                            vec![
                                m.id.clone(),
                                m.name.clone(),
                                m.viewpoints.len().to_string(),
                                m.description.clone(),
                            ]
                        })
                        .collect(),
                ),
            }
            Ok(())
        }

        Commands::Viewpoints { model_id } => {
            match ctx.catalog.viewpoints(model_id) {
                Some(viewpoints) => match mode {
                    OutputMode::Json => output_json(&viewpoints),
                    OutputMode::Human => print_table(
                        &["id", "name", "button", "position"],
                        viewpoints
                            .iter()
                            .map(|vp| {
                                vec![
                                    vp.id.clone(),
                                    vp.name.clone(),
                                    vp.button_label.clone(),
                                    format!(
                                        "({:.2}, {:.2}, {:.2})",
                                        vp.camera.position.x,
                                        vp.camera.position.y,
                                        vp.camera.position.z
                                    ),
                                ]
                            })
                            .collect(),
                    ),
                },
                None => print_error(&format!("Model not found: '{}'", model_id)),
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "somaview",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
