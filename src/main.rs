//! EventDesk server entry point.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌────────────┐
//! │  Config  │───▶│ AppState │───▶│  Router   │───▶│ axum serve │
//! │  (YAML)  │    │ (stores) │    │ (/api/..) │    │            │
//! └──────────┘    └──────────┘    └───────────┘    └────────────┘
//! ```
//!
//! Usage: `eventdesk [--env dev] [--port 3000]`

use anyhow::{Context, Result};
use std::sync::Arc;

use eventdesk::config::AppConfig;
use eventdesk::gateway::{self, state::AppState};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = eventdesk::logging::init_logging(&app_config);

    tracing::info!(
        "Starting EventDesk ({}) in {} mode",
        env!("GIT_HASH"),
        env
    );

    let port = get_port_override().unwrap_or(app_config.gateway.port);

    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    rt.block_on(async {
        let state = AppState::from_config(&app_config).await?;
        tracing::info!("Storage backend: {}", state.storage_backend());
        gateway::run_server(&app_config.gateway.host, port, Arc::new(state)).await
    })
}
