//! Host platform tag.
//!
//! Detection itself belongs to the host; the core only consumes the tag
//! through [`PlatformInfo`] to decide platform-specific behavior.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform the app shell is running on.
///
/// Serialized as its tag; parsing ignores case everywhere, config included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Ios,
    Android,
    WebOs,
    BlackBerry,
    WindowsMobile,
    OperaMini,
    #[default]
    Web,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Ios,
        Platform::Android,
        Platform::WebOs,
        Platform::BlackBerry,
        Platform::WindowsMobile,
        Platform::OperaMini,
        Platform::Web,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::WebOs => "webos",
            Platform::BlackBerry => "blackberry",
            Platform::WindowsMobile => "windows-mobile",
            Platform::OperaMini => "opera-mini",
            Platform::Web => "web",
        }
    }

    /// Native shells deliver device events and can exit the app; a plain
    /// browser can do neither.
    pub fn is_native(self) -> bool {
        self != Platform::Web
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown platform: {s}"))
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

/// Supplies the platform tag to whoever needs it.
pub trait PlatformInfo {
    fn platform(&self) -> Platform;

    /// Returns `true` if running on `platform`.
    fn is(&self, platform: Platform) -> bool {
        self.platform() == platform
    }
}

impl PlatformInfo for Platform {
    fn platform(&self) -> Platform {
        *self
    }
}
