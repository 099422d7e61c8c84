//! Call Analysis Agent - Main Entry Point
//!
//! Starts either the web API or the stdio tool server.

use anyhow::Context;
use call_analysis::agent::{seed::seed_sample_data, store::TranscriptStore};
use call_analysis::api::{run_server, AppState};
use call_analysis::config::{AppConfig, Cli, Mode};
use call_analysis::mcp::ToolServer;
use call_analysis::service::CallAnalysisService;
use clap::Parser;
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the tool server
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from(Cli::parse());

    let store = TranscriptStore::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;
    info!("Using database {}", config.database_path.display());

    if config.seed_sample_data {
        let inserted = seed_sample_data(&store).context("Failed to seed sample transcripts")?;
        info!("Sample data ready ({} new transcripts)", inserted);
    }

    let service = CallAnalysisService::new(store);

    match config.mode {
        Mode::Http { host, port } => {
            let state = Arc::new(AppState::new(service));
            run_server(state, &host, port).await?;
        }
        Mode::Stdio => {
            ToolServer::new(service).serve_stdio().await?;
        }
        Mode::SeedOnly => {}
    }

    Ok(())
}
