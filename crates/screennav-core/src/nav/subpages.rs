//! Subpage history within the visible screen.

use crate::content::ContentPath;

/// Immutable stack of subpages for the current screen, most recent last.
///
/// The stack remembers the screen's default subpage (`base`) so that the
/// first push onto an empty stack can put it underneath the new entry.
/// Going back from the first pushed subpage then lands on the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpageStack {
    base: ContentPath,
    entries: Vec<ContentPath>,
}

impl SubpageStack {
    /// Creates an empty stack whose synthesized base entry is `base`.
    pub fn new(base: ContentPath) -> Self {
        Self {
            base,
            entries: Vec::new(),
        }
    }

    /// Pushes `path`. An empty stack first receives the base entry, so the
    /// result always has at least two entries.
    pub fn push(&self, path: ContentPath) -> Self {
        let mut entries = self.entries.clone();
        if entries.is_empty() {
            entries.push(self.base.clone());
        }
        entries.push(path);
        Self {
            base: self.base.clone(),
            entries,
        }
    }

    /// Removes up to `count` entries, stopping at empty, and returns the new
    /// stack together with its top.
    pub fn pop(&self, count: usize) -> (Self, Option<ContentPath>) {
        let keep = self.entries.len().saturating_sub(count);
        let entries = self.entries[..keep].to_vec();
        let top = entries.last().cloned();
        (
            Self {
                base: self.base.clone(),
                entries,
            },
            top,
        )
    }

    /// Replaces everything with `path` as the single base entry.
    pub fn reset_to(&self, path: ContentPath) -> Self {
        Self {
            base: self.base.clone(),
            entries: vec![path],
        }
    }

    /// Truncates to the first entry and returns it, or `None` when empty.
    pub fn rewind(&self) -> Option<(Self, ContentPath)> {
        let first = self.entries.first()?.clone();
        Some((self.reset_to(first.clone()), first))
    }

    /// Drops every entry. The base used for future pushes is kept.
    pub fn clear(&self) -> Self {
        Self::new(self.base.clone())
    }

    /// Returns the visible subpage, if any.
    pub fn current(&self) -> Option<&ContentPath> {
        self.entries.last()
    }

    /// The default subpage synthesized under the first push.
    pub fn base(&self) -> &ContentPath {
        &self.base
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ContentPath> {
        self.entries.iter()
    }
}
