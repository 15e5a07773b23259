//! Error types for `screennav-core`.
//!
//! Fallible operations in the core library return [`NavResult<T>`],
//! which is an alias for `Result<T, NavError>`. Outcomes such as popping
//! past the root or hitting a busy axis are not errors; they are reported
//! through [`crate::event::Outcome`].

/// Unified error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The loader could not find the requested content.
    #[error("content not found: {0}")]
    ContentNotFound(String),

    /// A screen or subpage name cannot be turned into a content path.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// The HTTP transport failed for a reason other than a missing page.
    #[error("transport error: {0}")]
    Transport(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NavError {
    /// Returns `true` for the not-found case, which triggers a rollback
    /// rather than being surfaced to the user.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavError::ContentNotFound(_))
    }
}

/// Convenience alias used throughout `screennav-core`.
pub type NavResult<T> = Result<T, NavError>;
