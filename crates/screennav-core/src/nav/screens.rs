//! Top-level screen history.

use crate::content::ContentPath;

/// Immutable stack of screens, most recent last.
///
/// Every mutation returns a **new** `ScreenStack`, so a navigation that is
/// still loading can hold its tentative stack without touching the
/// committed one. Dropping the tentative value is the rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenStack {
    entries: Vec<ContentPath>,
}

impl ScreenStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `path`, making it the current screen.
    ///
    /// Returns a new `ScreenStack`.
    pub fn push(&self, path: ContentPath) -> Self {
        let mut entries = self.entries.clone();
        entries.push(path);
        Self { entries }
    }

    /// Drops the current screen. Returns the new stack and the screen that
    /// should be displayed again, or `None` when there is no previous screen.
    ///
    /// The root screen is never popped; the caller decides what "no previous
    /// screen" means (usually exiting the app).
    pub fn pop(&self) -> Option<(Self, ContentPath)> {
        if self.entries.len() < 2 {
            return None;
        }
        let mut entries = self.entries.clone();
        entries.pop();
        let previous = entries.last()?.clone();
        Some((Self { entries }, previous))
    }

    /// Returns the visible screen, if any.
    pub fn current(&self) -> Option<&ContentPath> {
        self.entries.last()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates from the root screen to the current one.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ContentPath> {
        self.entries.iter()
    }
}
