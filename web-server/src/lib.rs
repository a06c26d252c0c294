//! Allocator dump web server
//!
//! Lists and serves dump files from a root directory, renders them into
//! presentation trees on request, and serves the UI assets.

pub mod error;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use error::ApiError;
pub use state::AppState;

/// Build the router: API routes, then static assets for everything else
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health_check))
        .route("/api/files", get(routes::list_files))
        .route("/api/file", get(routes::get_file))
        .route("/api/visualize", get(routes::visualize))
        // UI bundle
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
