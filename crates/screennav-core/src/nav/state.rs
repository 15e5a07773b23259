//! Navigation state shared by both stack axes.
//!
//! [`NavigationState`] owns the committed [`ScreenStack`] and [`SubpageStack`]
//! plus an Idle/Loading guard per axis. A navigation begins by taking a
//! [`RequestToken`]; the token must still be current when the load finishes,
//! otherwise the result is stale and is dropped.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::content::ContentPath;
use crate::nav::screens::ScreenStack;
use crate::nav::subpages::SubpageStack;

/// One of the two independent navigation histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Screen,
    Subpage,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Screen => "screen",
            Axis::Subpage => "subpage",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "screen" => Ok(Axis::Screen),
            "subpage" => Ok(Axis::Subpage),
            other => Err(format!("unknown axis: {other}")),
        }
    }
}

/// Whether an axis has a navigation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
}

/// Identifies one in-flight navigation on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    axis: Axis,
    id: u64,
}

impl RequestToken {
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisGuard {
    phase: Phase,
    generation: u64,
}

/// Committed stacks plus the per-axis loading guards.
#[derive(Debug, Clone)]
pub struct NavigationState {
    screens: ScreenStack,
    subpages: SubpageStack,
    screen_guard: AxisGuard,
    subpage_guard: AxisGuard,
}

impl NavigationState {
    /// Creates empty stacks. `default_subpage` is synthesized under the
    /// first subpage pushed on each screen.
    pub fn new(default_subpage: ContentPath) -> Self {
        Self {
            screens: ScreenStack::new(),
            subpages: SubpageStack::new(default_subpage),
            screen_guard: AxisGuard::default(),
            subpage_guard: AxisGuard::default(),
        }
    }

    pub fn screens(&self) -> &ScreenStack {
        &self.screens
    }

    pub fn subpages(&self) -> &SubpageStack {
        &self.subpages
    }

    pub fn phase(&self, axis: Axis) -> Phase {
        self.guard(axis).phase
    }

    /// Moves `axis` from Idle to Loading. Returns `None` if a navigation is
    /// already in flight on that axis.
    pub fn begin(&mut self, axis: Axis) -> Option<RequestToken> {
        let guard = self.guard_mut(axis);
        if guard.phase == Phase::Loading {
            return None;
        }
        guard.phase = Phase::Loading;
        guard.generation += 1;
        Some(RequestToken {
            axis,
            id: guard.generation,
        })
    }

    /// Returns `true` if `token` belongs to the navigation currently loading.
    pub fn is_current(&self, token: RequestToken) -> bool {
        let guard = self.guard(token.axis);
        guard.phase == Phase::Loading && guard.generation == token.id
    }

    /// Returns the axis to Idle without committing. Stale tokens are ignored.
    pub fn finish(&mut self, token: RequestToken) {
        if self.is_current(token) {
            self.guard_mut(token.axis).phase = Phase::Idle;
        }
    }

    /// Invalidates any in-flight navigation on `axis`. Returns `true` if one
    /// was loading.
    pub fn cancel(&mut self, axis: Axis) -> bool {
        let guard = self.guard_mut(axis);
        let was_loading = guard.phase == Phase::Loading;
        guard.generation += 1;
        guard.phase = Phase::Idle;
        was_loading
    }

    /// Installs a new screen stack. The subpage stack is cleared and any
    /// subpage navigation still loading for the old screen is cancelled.
    ///
    /// Returns `false` without changing anything if `token` is stale.
    pub fn commit_screens(&mut self, token: RequestToken, screens: ScreenStack) -> bool {
        if token.axis != Axis::Screen || !self.is_current(token) {
            return false;
        }
        self.screens = screens;
        self.subpages = self.subpages.clear();
        self.cancel(Axis::Subpage);
        self.screen_guard.phase = Phase::Idle;
        true
    }

    /// Installs a new subpage stack. Returns `false` if `token` is stale.
    pub fn commit_subpages(&mut self, token: RequestToken, subpages: SubpageStack) -> bool {
        if token.axis != Axis::Subpage || !self.is_current(token) {
            return false;
        }
        self.subpages = subpages;
        self.subpage_guard.phase = Phase::Idle;
        true
    }

    fn guard(&self, axis: Axis) -> &AxisGuard {
        match axis {
            Axis::Screen => &self.screen_guard,
            Axis::Subpage => &self.subpage_guard,
        }
    }

    fn guard_mut(&mut self, axis: Axis) -> &mut AxisGuard {
        match axis {
            Axis::Screen => &mut self.screen_guard,
            Axis::Subpage => &mut self.subpage_guard,
        }
    }
}
