//! tarab-server - Arabic music catalog backend
//!
//! HTTP/JSON service over a SQLite catalog of uploaded songs, with simulated
//! AI training and generation workflows. Training progress and generation
//! latency are random draws, not real model computation.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tarab_common::config::{listen_port, RootFolderInitializer, RootFolderResolver};
use tarab_common::db::init_database;
use tarab_server::{build_router, AppState, Sampler};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "tarab-server", version)]
struct Cli {
    /// Root folder holding the database (overrides TARAB_ROOT_FOLDER and the
    /// config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// HTTP listen port (overrides the PORT environment variable)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting tarab-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();

    // Resolve root folder: CLI > env > config file > OS default
    let resolver = RootFolderResolver::new(cli.root_folder);
    let root_folder = resolver.resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool, Sampler::from_entropy());
    let app = build_router(state);

    let port = cli.port.unwrap_or_else(listen_port);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("tarab-server listening on http://0.0.0.0:{}", port);
    info!("Health check: http://0.0.0.0:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
