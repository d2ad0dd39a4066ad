//! JSON document implementation of LinkStore
//!
//! The whole collection lives in one file shaped like `{ "links": [...] }`.
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers never observe a half-written document.

use crate::core::error::StorageError;
use crate::core::{Link, LinkStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct LinksDocument {
    #[serde(default)]
    links: Vec<Link>,
}

/// Link store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileLinkStore {
    path: PathBuf,
}

impl JsonFileLinkStore {
    /// Create a store for the document at `path`
    ///
    /// Nothing is touched on disk until the first `replace`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LinkStore for JsonFileLinkStore {
    async fn load(&self) -> Result<Vec<Link>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "link document absent, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: LinksDocument =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;

        trace!(count = document.links.len(), "loaded link document");
        Ok(document.links)
    }

    async fn replace(&self, links: &[Link]) -> Result<(), StorageError> {
        let document = LinksDocument {
            links: links.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&document).map_err(StorageError::Serialize)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .map_err(|e| StorageError::Write {
                path: self.path.clone(),
                source: io::Error::other(e),
            })?
    }

    fn backend(&self) -> &'static str {
        "json-file"
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let write_err = |source: io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        debug!("Creating parent directory: {}", dir.display());
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(bytes).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    #[cfg(unix)]
    {
        if let Ok(dir) = std::fs::File::open(dir) {
            let _ = dir.sync_all();
        }
    }

    debug!(path = %path.display(), bytes = bytes.len(), "link document replaced");
    Ok(())
}
