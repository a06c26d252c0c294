//! Local directory of dump files
//!
//! Lists every regular file under a root and reads files by relative name.
//! Names that would resolve outside the root are rejected.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use super::{DocumentSource, FileEntry};
use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, which must be an existing directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = root.as_ref();
        let root = path
            .canonicalize()
            .map_err(|source| SourceError::RootUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        if !root.is_dir() {
            return Err(SourceError::RootUnavailable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every regular file under the root, sorted by relative name
    pub fn list_files(&self) -> Result<Vec<FileEntry>, SourceError> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let filename = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let size = entry.metadata()?.len();
            entries.push(FileEntry { filename, size });
        }
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        tracing::debug!(root = %self.root.display(), files = entries.len(), "listed files");
        Ok(entries)
    }

    /// Read `name` as UTF-8
    pub fn read_file(&self, name: &str) -> Result<String, SourceError> {
        let path = self.resolve(name)?;
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            _ => SourceError::Io(e),
        })
    }

    /// Resolve `name` to a path strictly inside the root
    pub fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        let invalid = || SourceError::InvalidFilename {
            name: name.to_string(),
        };

        let relative = Path::new(name);
        if name.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(invalid());
        }

        let joined = self.root.join(relative);
        let resolved = match joined.canonicalize() {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(SourceError::Io(e)),
        };

        // Symlinks may still point outside.
        if resolved == self.root || !resolved.starts_with(&self.root) {
            tracing::warn!(name, "rejected filename outside root");
            return Err(invalid());
        }
        Ok(resolved)
    }
}

#[async_trait]
impl DocumentSource for FileStore {
    async fn list(&self) -> Result<Vec<FileEntry>, SourceError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.list_files()).await?
    }

    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let store = self.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || store.read_file(&name)).await?
    }
}
