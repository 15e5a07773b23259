//! screennav core library: UI-agnostic navigation for hybrid app shells.
//!
//! `screennav-core` tracks a stack of top-level screens and, within the
//! visible screen, a stack of subpages. Navigation requests load markup
//! through a [`Loader`], commit the stack change only when the load
//! succeeds, and hand transitions to a renderer as [`RenderEvent`]s.
//!
//! # Modules
//!
//! - [`nav`]: [`ScreenStack`], [`SubpageStack`] and the per-axis [`NavigationState`].
//! - [`navigator`]: the [`Navigator`] service that runs [`NavigationCommand`]s.
//! - [`loader`]: the [`Loader`] trait with filesystem, HTTP and in-memory loaders.
//! - [`lifecycle`]: device event handling (`deviceready`, `pause`, `resume`, back button).
//! - [`platform`]: the [`Platform`] tag and [`PlatformInfo`] provider trait.
//! - [`config`]: TOML-based settings ([`NavConfig`]).
//! - [`event`]: commands, outcomes and renderer events.
//! - [`error`]: unified error type ([`NavError`]) and result alias ([`NavResult`]).

pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod loader;
pub mod nav;
pub mod navigator;
pub mod platform;
pub mod transition;

pub use config::settings::{LoaderKind, NavConfig};
pub use content::{Content, ContentPath};
pub use error::{NavError, NavResult};
pub use event::{NavigationCommand, Outcome, RenderEvent};
pub use lifecycle::{dispatch, LifecycleEvent, LifecycleHandler, LifecycleOutcome, Reaction};
pub use loader::{ConfiguredLoader, FsLoader, HttpLoader, Loader, MemoryLoader};
pub use nav::screens::ScreenStack;
pub use nav::state::{Axis, NavigationState, Phase};
pub use nav::subpages::SubpageStack;
pub use navigator::Navigator;
pub use platform::{Platform, PlatformInfo};
pub use transition::{Direction, Effect, Transition, TransitionKind};
