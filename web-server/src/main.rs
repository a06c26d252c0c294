//! Allocator dump web server
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   ROOT_DIRECTORY directory of dump files (required)
//!   PORT           listen port (default: 3000)
//!   BIND_ADDR      listen host (default: 0.0.0.0)
//!   STATIC_DIR     UI assets (default: static)

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use alloc_viz::source::FileStore;
use alloc_viz::ServerConfig;
use alloc_viz_web_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alloc_viz=info,alloc_viz_web_server=info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let store = FileStore::open(&config.root_directory)?;
    info!("Serving dumps from {}", store.root().display());

    let app = create_router(AppState::new(Arc::new(store)), &config.static_dir);

    let addr = config.listen_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
