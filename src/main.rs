//! Somaview - voice navigation core for 3D anatomy viewers
//!
//! Usage:
//!   somaview mcp                         Start MCP server on stdio
//!   somaview suggest "right shoulder"    Score a query against the catalog
//!   somaview resolve "show the front"    Run one full turn
//!   somaview models                      List catalog models
//!   somaview viewpoints <model-id>       List a model's viewpoints
//!   somaview --help                      Show all commands

use anyhow::Result;
use clap::{CommandFactory, Parser};

use somaview::cli::output::OutputMode;
use somaview::cli::{Cli, Commands};
use somaview::init::AppContext;
use somaview::mcp::server::run_mcp_server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr (safe for MCP stdio transport)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("somaview=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Commands::Completions { shell } => {
            // No catalog needed for completions.
            clap_complete::generate(*shell, &mut Cli::command(), "somaview", &mut std::io::stdout());
        }
        Commands::Mcp => {
            let ctx = AppContext::new(cli.catalog.clone(), cli.scoring.clone())?;
            run_mcp_server(ctx).await?;
        }
        cmd => {
            let ctx = AppContext::new(cli.catalog.clone(), cli.scoring.clone())?;
            somaview::cli::execute(cmd, &ctx, mode).await?;
        }
    }

    Ok(())
}
