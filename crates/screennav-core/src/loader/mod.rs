//! Content loaders.
//!
//! A [`Loader`] answers two questions for a [`ContentPath`]: does it exist
//! ([`Loader::probe`]) and what is its markup ([`Loader::fetch`]). The
//! navigator always probes before fetching, so a cheap existence check can
//! reject a missing page before any transfer happens.

pub mod fs;
pub mod http;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::settings::{LoaderConfig, LoaderKind};
use crate::content::{Content, ContentPath};
use crate::error::{NavError, NavResult};

pub use fs::FsLoader;
pub use http::HttpLoader;

/// Source of screen and subpage markup.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Lightweight existence check.
    async fn probe(&self, path: &ContentPath) -> bool;

    /// Fetches the markup for `path`.
    ///
    /// # Errors
    ///
    /// [`NavError::ContentNotFound`] if the content does not exist; other
    /// variants for transport or I/O failures.
    async fn fetch(&self, path: &ContentPath) -> NavResult<Content>;
}

/// Fixed set of pages held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    pages: HashMap<ContentPath, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page and returns the loader, for chaining.
    pub fn with_page(mut self, path: impl Into<ContentPath>, markup: impl Into<String>) -> Self {
        self.pages.insert(path.into(), markup.into());
        self
    }
}

#[async_trait]
impl Loader for MemoryLoader {
    async fn probe(&self, path: &ContentPath) -> bool {
        self.pages.contains_key(path)
    }

    async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
        self.pages
            .get(path)
            .map(|markup| Content::new(path.clone(), markup.clone()))
            .ok_or_else(|| NavError::ContentNotFound(path.to_string()))
    }
}

/// The loader selected by [`LoaderConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredLoader {
    Fs(FsLoader),
    Http(HttpLoader),
}

impl ConfiguredLoader {
    /// Builds the loader named by `config.kind`.
    ///
    /// # Errors
    ///
    /// [`NavError::ConfigParse`] if the HTTP loader is selected without a
    /// `base_url`; [`NavError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &LoaderConfig) -> NavResult<Self> {
        match config.kind {
            LoaderKind::Fs => Ok(ConfiguredLoader::Fs(FsLoader::new(config.root.clone()))),
            LoaderKind::Http => {
                let base_url = config.base_url.as_deref().ok_or_else(|| {
                    NavError::ConfigParse("loader.base_url is required for kind = \"http\"".into())
                })?;
                Ok(ConfiguredLoader::Http(HttpLoader::new(base_url)?))
            }
        }
    }
}

#[async_trait]
impl Loader for ConfiguredLoader {
    async fn probe(&self, path: &ContentPath) -> bool {
        match self {
            ConfiguredLoader::Fs(loader) => loader.probe(path).await,
            ConfiguredLoader::Http(loader) => loader.probe(path).await,
        }
    }

    async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
        match self {
            ConfiguredLoader::Fs(loader) => loader.fetch(path).await,
            ConfiguredLoader::Http(loader) => loader.fetch(path).await,
        }
    }
}
