//! API handlers
//!
//! - `GET /api/health`                   liveness
//! - `GET /api/files`                    every dump under the root, `[{filename, size}]`
//! - `GET /api/file?filename=NAME`       raw dump text
//! - `GET /api/visualize?filename=NAME`  walked frames as a flat node arena plus the allocation report

use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use alloc_viz::graph::{walk_frames, FlatForest, GraphContext};
use alloc_viz::source::{parse_document, FileEntry};
use alloc_viz::visualizer::AllocationReport;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub filename: Option<String>,
}

impl FileQuery {
    fn filename(&self) -> Result<&str, ApiError> {
        self.filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ApiError::InvalidFilename)
    }
}

/// `{nodes, frames, allocations}`; frame roots and children index `nodes`
#[derive(Debug, Serialize)]
pub struct VisualizationResponse {
    #[serde(flatten)]
    pub forest: FlatForest,
    pub allocations: AllocationReport,
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<FileEntry>>, ApiError> {
    let files = state.source.list().await.map_err(ApiError::List)?;
    Ok(Json(files))
}

pub async fn get_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filename = query.filename()?;
    let text = state
        .source
        .fetch(filename)
        .await
        .map_err(ApiError::from_fetch)?;
    Ok(([(CONTENT_TYPE, "application/json")], text))
}

pub async fn visualize(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<VisualizationResponse>, ApiError> {
    let filename = query.filename()?;
    let text = state
        .source
        .fetch(filename)
        .await
        .map_err(ApiError::from_fetch)?;

    // Parsing and walking run to completion; keep them off the async workers.
    let response = tokio::task::spawn_blocking(move || {
        let doc = parse_document(&text).map_err(ApiError::MalformedDocument)?;
        let context = GraphContext::build(doc);
        Ok::<_, ApiError>(VisualizationResponse {
            forest: FlatForest::from_frames(&walk_frames(&context)),
            allocations: AllocationReport::from_context(&context),
        })
    })
    .await??;

    tracing::info!(
        filename,
        frames = response.forest.frames.len(),
        nodes = response.forest.nodes.len(),
        allocations = response.allocations.total,
        "visualization built"
    );
    Ok(Json(response))
}
