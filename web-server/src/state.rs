//! Shared application state
//!
//! The server only needs somewhere to list and fetch dumps from. Parsing and
//! walking happen per request; nothing is cached between requests.

use std::sync::Arc;

use alloc_viz::source::DocumentSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DocumentSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }
}
