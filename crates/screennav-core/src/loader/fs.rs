//! Loader that reads pages from a local content root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::content::{Content, ContentPath};
use crate::error::{NavError, NavResult};
use crate::loader::Loader;

/// Serves pages from files under `root`, e.g. `www/screens/connect.html`.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &ContentPath) -> PathBuf {
        self.root.join(path.as_str())
    }
}

#[async_trait]
impl Loader for FsLoader {
    async fn probe(&self, path: &ContentPath) -> bool {
        tokio::fs::metadata(self.file_path(path))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
        let markup = tokio::fs::read_to_string(self.file_path(path))
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => NavError::ContentNotFound(path.to_string()),
                _ => NavError::Io(e),
            })?;
        Ok(Content::new(path.clone(), markup))
    }
}
