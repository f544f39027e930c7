//! Issue graph API server
//!
//! Walks the relationships around one Jira issue and serves them as a
//! node/edge graph for the browser client.

mod config;
mod details;
mod graph;
mod model;
mod routes;
mod tracker;
mod util;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use routes::AppState;

#[derive(Debug, Parser)]
#[command(name = "issue-graph", version, about = "Serve Jira issue relationship graphs")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "ISSUE_GRAPH_BIND", default_value = "127.0.0.1:8000")]
    bind: String,

    /// Config file (defaults to ~/.issue-graph/config.toml)
    #[arg(long, env = "ISSUE_GRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Deadline for a whole API request, including every tracker fetch it makes
    #[arg(long, env = "ISSUE_GRAPH_REQUEST_TIMEOUT", default_value_t = 60)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("issue_graph=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path)?;
    info!("Using config at {}", config_path.display());

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let state = AppState::new(config.default_credentials(), http);

    // The browser client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(cli.request_timeout_secs)))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!("Server listening on http://{}", cli.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
