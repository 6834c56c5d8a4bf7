//! HTTP front end for the pipe network editor
//!
//! The browser map talks to this service: markers and polylines are drawn
//! from `/nodes` and `/pipes`, drag-end events go to `/nodes/{id}/position`
//! and the elevation lookup is proxied through `/elevation`.

mod config;
mod routes;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use axum::BoxError;
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(version, about = "Serve a pipe network editor over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the bind address from the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Node export to load on startup
    #[arg(long)]
    nodes: Option<PathBuf>,

    /// Pipe export to load on startup, after the nodes
    #[arg(long, requires = "nodes")]
    pipes: Option<PathBuf>,
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("service unavailable: {err}"),
        )
    }
}

fn seed(state: &AppState, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(nodes) = &args.nodes else {
        return Ok(());
    };
    let mut editor = state
        .editor()
        .map_err(|(_, message)| message)?;

    let report = editor.import_nodes(&std::fs::read_to_string(nodes)?)?;
    tracing::info!(
        path = %nodes.display(),
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "seeded nodes"
    );

    if let Some(pipes) = &args.pipes {
        let report = editor.import_pipes(&std::fs::read_to_string(pipes)?)?;
        tracing::info!(
            path = %pipes.display(),
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "seeded pipes"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn serve(config: ServerConfig, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = routes::router()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .concurrency_limit(config.max_concurrent_requests),
        )
        .layer(TraceLayer::new_for_http());
    if config.permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.bind.clone_from(bind);
    }

    // The blocking elevation client owns its own runtime, so it is built
    // and dropped outside of the server runtime.
    let state = AppState::new(&config)?;
    seed(&state, &args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(config, state.clone()));
    drop(runtime);
    drop(state);
    result
}
