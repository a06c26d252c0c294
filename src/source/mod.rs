//! Document sources
//!
//! Raw dumps come from a local directory (`FileStore`) or from a running
//! visualizer server (`RemoteSource`). Both list files and fetch raw text;
//! parsing into a `Document` happens once at the boundary.

pub mod document;
pub mod file_store;
pub mod listing;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

pub use document::{load_document, parse_document};
pub use file_store::FileStore;
pub use listing::{ListingQuery, ListingView, SortCriterion, SortField, MAX_LISTED_FILES};
pub use remote::RemoteSource;

/// A listed dump file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    /// Size in bytes
    pub size: u64,
}

/// Lists and fetches raw documents by name
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list(&self) -> Result<Vec<FileEntry>, SourceError>;

    async fn fetch(&self, name: &str) -> Result<String, SourceError>;
}
