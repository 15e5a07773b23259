//! Commands, outcomes and renderer events.
//!
//! The host turns user input and device events into [`NavigationCommand`]s.
//! The navigator answers each with an [`Outcome`] and sends the visual side
//! effects to the renderer as [`RenderEvent`]s.

use serde::Serialize;

use crate::content::{Content, ContentPath};
use crate::nav::state::Axis;
use crate::transition::{Direction, Effect, Transition};

/// A navigation the host asks the core to perform.
///
/// Commands flow **host → core**. The core never creates commands itself,
/// except through [`crate::lifecycle::LifecycleHandler`] reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationCommand {
    /// Load the screen with the given short name and push it.
    PushScreen {
        name: String,
        /// Overrides the configured screen effect.
        effect: Option<Effect>,
    },
    /// Go back to the previous screen.
    PopScreen,
    /// Load the subpage with the given short name and push it.
    PushSubpage(String),
    /// Go back by this many subpages.
    PopSubpage(usize),
    /// Go back to the first subpage of the current screen.
    FirstSubpage,
}

impl NavigationCommand {
    pub fn push_screen(name: impl Into<String>) -> Self {
        NavigationCommand::PushScreen {
            name: name.into(),
            effect: None,
        }
    }

    pub fn push_subpage(name: impl Into<String>) -> Self {
        NavigationCommand::PushSubpage(name.into())
    }

    /// The stack this command mutates.
    pub fn axis(&self) -> Axis {
        match self {
            NavigationCommand::PushScreen { .. } | NavigationCommand::PopScreen => Axis::Screen,
            NavigationCommand::PushSubpage(_)
            | NavigationCommand::PopSubpage(_)
            | NavigationCommand::FirstSubpage => Axis::Subpage,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            NavigationCommand::PushScreen { .. } | NavigationCommand::PushSubpage(_) => {
                Direction::Forward
            }
            NavigationCommand::PopScreen
            | NavigationCommand::PopSubpage(_)
            | NavigationCommand::FirstSubpage => Direction::Reverse,
        }
    }
}

/// How a navigation request ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The stack mutation was committed and `path` is now displayed.
    Committed {
        axis: Axis,
        path: ContentPath,
        direction: Direction,
    },
    /// Nothing to go back to on this axis.
    NoPrevious(Axis),
    /// A subpage was requested while no screen is displayed to hold it.
    NoScreen,
    /// Another navigation is loading on this axis; the request was rejected.
    Busy(Axis),
    /// The request was superseded while loading and changed nothing.
    Cancelled(Axis),
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed { .. })
    }
}

/// A presentation side effect for the renderer.
///
/// Events flow **core → renderer**.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    /// Show freshly loaded content with the given animation.
    Transition {
        axis: Axis,
        content: Content,
        transition: Transition,
    },
    /// The animation has finished; the previous content can be removed.
    RemoveStale { axis: Axis, path: ContentPath },
}
