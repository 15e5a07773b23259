//! Device lifecycle handling.
//!
//! The host forwards `deviceready`, `pause`, `resume`, `backbutton` and
//! `resize` as [`LifecycleEvent`]s. [`LifecycleHandler::react`] decides what
//! each means for navigation given the current state, and [`dispatch`] carries
//! the decision out against a [`Navigator`].

use std::str::FromStr;
use std::time::Duration;

use crate::config::settings::NavConfig;
use crate::content::ContentPath;
use crate::error::NavResult;
use crate::event::{NavigationCommand, Outcome};
use crate::loader::Loader;
use crate::nav::state::NavigationState;
use crate::navigator::Navigator;
use crate::platform::{Platform, PlatformInfo};

/// A signal from the device or host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    DeviceReady,
    Pause,
    Resume,
    BackButton,
    Resize,
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deviceready" | "ready" => Ok(LifecycleEvent::DeviceReady),
            "pause" => Ok(LifecycleEvent::Pause),
            "resume" => Ok(LifecycleEvent::Resume),
            "backbutton" => Ok(LifecycleEvent::BackButton),
            "resize" => Ok(LifecycleEvent::Resize),
            other => Err(format!("unknown lifecycle event: {other}")),
        }
    }
}

/// What the app should do in response to a [`LifecycleEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Run `command` once `after` has elapsed.
    Navigate {
        command: NavigationCommand,
        after: Duration,
    },
    /// Close the app.
    Exit,
    /// The app is going to the background; release device sessions.
    Suspend,
    Ignore,
}

/// Result of [`dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Navigated(Outcome),
    Exit,
    Suspend,
    Ignored,
}

/// Maps lifecycle events to reactions.
#[derive(Debug, Clone)]
pub struct LifecycleHandler {
    platform: Platform,
    initial_screen: String,
    resume_pop_subpage: Option<ContentPath>,
    startup_delay: Duration,
}

impl LifecycleHandler {
    /// # Errors
    ///
    /// [`crate::NavError::InvalidName`] if `resume_pop_subpage` does not resolve.
    pub fn new(config: &NavConfig, platform: &dyn PlatformInfo) -> NavResult<Self> {
        let resume_pop_subpage = match config.navigation.resume_pop_subpage.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(config.content.resolve(name)?),
            _ => None,
        };
        Ok(Self {
            platform: platform.platform(),
            initial_screen: config.navigation.initial_screen.clone(),
            resume_pop_subpage,
            startup_delay: config.navigation.startup_delay(),
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Decides the reaction to `event` given the committed `state`.
    pub fn react(&self, event: LifecycleEvent, state: &NavigationState) -> Reaction {
        match event {
            LifecycleEvent::DeviceReady => Reaction::Navigate {
                command: NavigationCommand::push_screen(self.initial_screen.clone()),
                after: self.startup_delay,
            },
            LifecycleEvent::BackButton => {
                if state.subpages().depth() > 1 {
                    Reaction::Navigate {
                        command: NavigationCommand::PopSubpage(1),
                        after: Duration::ZERO,
                    }
                } else if self.platform.is_native() {
                    Reaction::Exit
                } else {
                    Reaction::Ignore
                }
            }
            LifecycleEvent::Resume => {
                let on_resume_page = self
                    .resume_pop_subpage
                    .as_ref()
                    .is_some_and(|page| state.subpages().current() == Some(page));
                if on_resume_page {
                    Reaction::Navigate {
                        command: NavigationCommand::PopSubpage(1),
                        after: Duration::ZERO,
                    }
                } else {
                    Reaction::Ignore
                }
            }
            LifecycleEvent::Pause => Reaction::Suspend,
            LifecycleEvent::Resize => Reaction::Ignore,
        }
    }
}

/// Reacts to `event` and performs any resulting navigation.
///
/// # Errors
///
/// Propagates the navigation error if the reaction's load fails.
pub async fn dispatch<L: Loader>(
    handler: &LifecycleHandler,
    navigator: &Navigator<L>,
    event: LifecycleEvent,
) -> NavResult<LifecycleOutcome> {
    tracing::debug!("lifecycle event: {event:?}");
    let reaction = handler.react(event, &navigator.snapshot());
    match reaction {
        Reaction::Navigate { command, after } => {
            if !after.is_zero() {
                tokio::time::sleep(after).await;
            }
            let outcome = navigator.request(command).await?;
            Ok(LifecycleOutcome::Navigated(outcome))
        }
        Reaction::Exit => {
            tracing::info!("back pressed at root; exiting");
            Ok(LifecycleOutcome::Exit)
        }
        Reaction::Suspend => {
            tracing::info!("paused");
            Ok(LifecycleOutcome::Suspend)
        }
        Reaction::Ignore => Ok(LifecycleOutcome::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    use crate::loader::MemoryLoader;
    use crate::nav::state::Axis;

    fn p(s: &str) -> ContentPath {
        ContentPath::new(s)
    }

    fn handler(platform: Platform) -> LifecycleHandler {
        LifecycleHandler::new(&NavConfig::default(), &platform).unwrap()
    }

    fn state_with_subpages(pushed: &[&str]) -> NavigationState {
        let mut state = NavigationState::new(p("screens/connect.html"));
        for path in pushed {
            let token = state.begin(Axis::Subpage).unwrap();
            let next = state.subpages().push(p(path));
            assert!(state.commit_subpages(token, next));
        }
        state
    }

    #[test]
    fn parses_event_names() {
        assert_eq!(
            "deviceready".parse::<LifecycleEvent>().unwrap(),
            LifecycleEvent::DeviceReady
        );
        assert_eq!(
            "ready".parse::<LifecycleEvent>().unwrap(),
            LifecycleEvent::DeviceReady
        );
        assert_eq!(
            "backbutton".parse::<LifecycleEvent>().unwrap(),
            LifecycleEvent::BackButton
        );
        assert!("menubutton".parse::<LifecycleEvent>().is_err());
    }

    #[test]
    fn device_ready_loads_initial_screen_after_delay() {
        let reaction = handler(Platform::Web).react(
            LifecycleEvent::DeviceReady,
            &state_with_subpages(&[]),
        );
        assert_eq!(
            reaction,
            Reaction::Navigate {
                command: NavigationCommand::push_screen("connect"),
                after: Duration::from_secs(1),
            }
        );
    }

    #[test]
    fn back_pops_subpage_when_deep_enough() {
        let state = state_with_subpages(&["screens/control.html"]);
        assert_eq!(
            handler(Platform::Android).react(LifecycleEvent::BackButton, &state),
            Reaction::Navigate {
                command: NavigationCommand::PopSubpage(1),
                after: Duration::ZERO,
            }
        );
    }

    #[test]
    fn back_at_root_exits_on_native_only() {
        let state = state_with_subpages(&[]);
        assert_eq!(
            handler(Platform::Android).react(LifecycleEvent::BackButton, &state),
            Reaction::Exit
        );
        assert_eq!(
            handler(Platform::Web).react(LifecycleEvent::BackButton, &state),
            Reaction::Ignore
        );
    }

    #[test]
    fn resume_pops_only_the_configured_subpage() {
        let on_control = state_with_subpages(&["screens/control.html"]);
        let on_other = state_with_subpages(&["screens/settings.html"]);
        let handler = handler(Platform::Ios);

        assert!(matches!(
            handler.react(LifecycleEvent::Resume, &on_control),
            Reaction::Navigate { .. }
        ));
        assert_eq!(
            handler.react(LifecycleEvent::Resume, &on_other),
            Reaction::Ignore
        );
    }

    #[test]
    fn empty_resume_subpage_disables_resume_pop() {
        let mut config = NavConfig::default();
        config.navigation.resume_pop_subpage = Some(String::new());
        let handler = LifecycleHandler::new(&config, &Platform::Ios).unwrap();
        let state = state_with_subpages(&["screens/control.html"]);
        assert_eq!(handler.react(LifecycleEvent::Resume, &state), Reaction::Ignore);
    }

    #[test]
    fn pause_suspends_and_resize_is_ignored() {
        let state = state_with_subpages(&[]);
        let handler = handler(Platform::Android);
        assert_eq!(handler.react(LifecycleEvent::Pause, &state), Reaction::Suspend);
        assert_eq!(handler.react(LifecycleEvent::Resize, &state), Reaction::Ignore);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_runs_startup_and_back_navigation() {
        let loader = MemoryLoader::new()
            .with_page("screens/connect.html", "connect")
            .with_page("screens/control.html", "control");
        let (tx, _rx) = unbounded_channel();
        let nav = Navigator::new(loader, &NavConfig::default(), tx).unwrap();
        let handler = handler(Platform::Android);

        let started = tokio::time::Instant::now();
        let outcome = dispatch(&handler, &nav, LifecycleEvent::DeviceReady)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(matches!(outcome, LifecycleOutcome::Navigated(o) if o.is_committed()));
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));

        nav.request(NavigationCommand::push_subpage("control"))
            .await
            .unwrap();
        let outcome = dispatch(&handler, &nav, LifecycleEvent::BackButton)
            .await
            .unwrap();
        assert!(matches!(outcome, LifecycleOutcome::Navigated(o) if o.is_committed()));
        assert_eq!(nav.current_subpage(), Some(p("screens/connect.html")));

        let outcome = dispatch(&handler, &nav, LifecycleEvent::BackButton)
            .await
            .unwrap();
        assert_eq!(outcome, LifecycleOutcome::Exit);
    }
}
