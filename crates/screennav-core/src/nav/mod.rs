//! Navigation stacks for screennav.
//!
//! This module contains the top-level [`screens::ScreenStack`], the
//! per-screen [`subpages::SubpageStack`], and the [`state::NavigationState`]
//! that owns both along with their Idle/Loading guards.

pub mod screens;
pub mod state;
pub mod subpages;
