//! Lingus Server Entry Point
//!
//! Scans the model directory once, optionally activates an initial model and
//! serves the word-embedding HTTP API.

use anyhow::Context;
use clap::Parser;
use lingus_embedding::Word2VecLoader;
use lingus_server::{ActiveModelGuard, ModelCatalog, SimilarityService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lingus-server")]
#[command(about = "Word-embedding similarity server with hot-swappable models")]
#[command(version)]
struct Args {
    /// Directory containing the word2vec model files
    #[arg(long, env = "LINGUS_DATA_DIR")]
    data_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "LINGUS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Model file to activate before serving requests
    #[arg(long)]
    activate: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingus_server=info,lingus_embedding=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let catalog = ModelCatalog::scan(&args.data_dir)
        .context("Application startup has been interrupted")?;
    tracing::info!(
        "Found {} model file(s) in {:?}",
        catalog.len(),
        catalog.directory()
    );

    let guard = ActiveModelGuard::new(Arc::new(Word2VecLoader));
    let service = Arc::new(SimilarityService::new(catalog, guard));

    if let Some(filename) = args.activate.as_deref() {
        match service.activate_model(filename).await {
            Ok(result) => tracing::info!("Initial model '{}' is active", result.activated),
            Err(e) => tracing::warn!("Starting without an active model: {}", e),
        }
    }

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!("Lingus server listening on {}", listener.local_addr()?);

    axum::serve(listener, lingus_server::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Lingus server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
