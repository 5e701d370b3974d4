//! Serve command - expose the configured checklists over HTTP

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Args;
use tokio::net::TcpListener;
use tracing::{error, info};

use checklisting_core::config::{resolve_config, ServerConfig};
use checklisting_core::{
    ChecklistProvider, ChecklistRunner, JsonSerializer, ResultWriterRegistry,
    StaticChecklistProvider,
};
use checklisting_tasks::TaskRegistry;

use super::runtime;
use crate::cli::{output, Cli};

/// Serve the configured checklists as JSON on `GET /`
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Configuration file (default: search the working directory and its parents)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind (default: `server.addr` from the configuration)
    #[arg(long)]
    pub addr: Option<String>,

    /// Port to listen on (default: `server.port` from the configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

struct ServeState {
    provider: StaticChecklistProvider,
    runner: ChecklistRunner,
}

/// Every request runs all checklists afresh; results also go to the log
pub(crate) fn router(provider: StaticChecklistProvider) -> Router {
    let state = Arc::new(ServeState {
        provider,
        runner: ChecklistRunner::new(ResultWriterRegistry::new()),
    });
    Router::new()
        .route("/", get(run_checklists))
        .with_state(state)
}

async fn run_checklists(State(state): State<Arc<ServeState>>) -> Response {
    let results = state.runner.run(&state.provider).await;
    match JsonSerializer.dumps_all(&results) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            error!(error = %err, "failed to encode checklist results");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
    }
}

impl ServeCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (config, path) = resolve_config(self.config.as_deref(), &cwd)?;
        let provider = TaskRegistry::new().build_provider(&config)?;
        let (addr, port) = self.bind_address(&config.server);
        info!(
            path = %path.display(),
            checklists = provider.get_all().len(),
            "executing serve command"
        );

        runtime()?.block_on(async {
            let listener = TcpListener::bind((addr.as_str(), port)).await?;
            let local = listener.local_addr()?;
            info!(addr = %local, "serving checklists");
            if !cli.quiet {
                output::success(&format!("Serving checklists on http://{}/", local));
            }

            axum::serve(listener, router(provider))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("shutting down");
            Ok::<_, anyhow::Error>(())
        })
    }

    /// Command-line values win over the configuration
    fn bind_address(&self, server: &ServerConfig) -> (String, u16) {
        (
            self.addr.clone().unwrap_or_else(|| server.addr.clone()),
            self.port.unwrap_or(server.port),
        )
    }
}
