//! Navigator configuration loaded from a TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::content::ContentPath;
use crate::error::{NavError, NavResult};
use crate::platform::Platform;
use crate::transition::Effect;

/// Top-level configuration.
///
/// All fields have defaults matching the stock app layout (`www/screens/*.html`,
/// starting on the `connect` screen). Call [`NavConfig::load`] to read a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl NavConfig {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`NavError::Io`] if the file cannot be read.
    /// - [`NavError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> NavResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> NavResult<Self> {
        toml::from_str(content).map_err(|e| NavError::ConfigParse(e.to_string()))
    }

    /// Path of the default subpage, synthesized under the first subpage push.
    pub fn default_subpage_path(&self) -> NavResult<ContentPath> {
        self.content.resolve(&self.navigation.default_subpage)
    }
}

/// How short names map to loader paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_screens_dir")]
    pub screens_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl ContentConfig {
    /// Resolves a short name like `connect` to `screens/connect.html`.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidName`] if the name is empty, absolute, or climbs
    /// out of the content directory.
    pub fn resolve(&self, name: &str) -> NavResult<ContentPath> {
        let name = name.trim();
        if name.is_empty()
            || name.starts_with('/')
            || name.split('/').any(|part| part == ".." || part.is_empty())
        {
            return Err(NavError::InvalidName(name.to_string()));
        }
        let dir = self.screens_dir.trim_end_matches('/');
        let path = if dir.is_empty() {
            format!("{name}.{}", self.extension)
        } else {
            format!("{dir}/{name}.{}", self.extension)
        };
        Ok(ContentPath::new(path))
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            screens_dir: default_screens_dir(),
            extension: default_extension(),
        }
    }
}

/// Which loader backs navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    #[default]
    Fs,
    Http,
}

/// Loader selection and location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub kind: LoaderKind,
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            kind: LoaderKind::Fs,
            root: default_root(),
            base_url: None,
        }
    }
}

/// Startup screen and lifecycle-driven navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_initial_screen")]
    pub initial_screen: String,
    #[serde(default = "default_subpage")]
    pub default_subpage: String,
    /// Subpage that is backed out of when the app resumes.
    #[serde(default = "default_resume_pop_subpage")]
    pub resume_pop_subpage: Option<String>,
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
}

impl NavigationConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            initial_screen: default_initial_screen(),
            default_subpage: default_subpage(),
            resume_pop_subpage: default_resume_pop_subpage(),
            startup_delay_ms: default_startup_delay_ms(),
        }
    }
}

/// Animation timing handed to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default)]
    pub screen_effect: Effect,
    #[serde(default = "default_subpage_duration_ms")]
    pub subpage_duration_ms: u64,
    #[serde(default = "default_cleanup_delay_ms")]
    pub cleanup_delay_ms: u64,
}

impl TransitionConfig {
    pub fn subpage_duration(&self) -> Duration {
        Duration::from_millis(self.subpage_duration_ms)
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.cleanup_delay_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            screen_effect: Effect::Slide,
            subpage_duration_ms: default_subpage_duration_ms(),
            cleanup_delay_ms: default_cleanup_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub tag: Platform,
}

fn default_screens_dir() -> String {
    "screens".to_string()
}

fn default_extension() -> String {
    "html".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("www")
}

fn default_initial_screen() -> String {
    "connect".to_string()
}

fn default_subpage() -> String {
    "connect".to_string()
}

fn default_resume_pop_subpage() -> Option<String> {
    Some("control".to_string())
}

fn default_startup_delay_ms() -> u64 {
    1000
}

fn default_subpage_duration_ms() -> u64 {
    250
}

fn default_cleanup_delay_ms() -> u64 {
    300
}
