//! The navigation service.
//!
//! [`Navigator::request`] runs one [`NavigationCommand`] through the
//! transition policy:
//!
//! 1. Take the axis guard (rejecting with [`Outcome::Busy`] if it is loading)
//!    and compute the tentative stack.
//! 2. Probe and fetch the target through the [`Loader`] with no lock held.
//! 3. If the request is still current, commit the tentative stack, send a
//!    [`RenderEvent::Transition`] and schedule a [`RenderEvent::RemoveStale`]
//!    for the content that was replaced. If the load failed, the tentative
//!    stack is dropped and the committed one is untouched.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::settings::{ContentConfig, NavConfig, TransitionConfig};
use crate::content::{Content, ContentPath};
use crate::error::{NavError, NavResult};
use crate::event::{NavigationCommand, Outcome, RenderEvent};
use crate::loader::Loader;
use crate::nav::screens::ScreenStack;
use crate::nav::state::{Axis, NavigationState, RequestToken};
use crate::nav::subpages::SubpageStack;
use crate::transition::{Direction, Effect, Transition};

/// Tentative stack computed before loading.
enum Pending {
    Screens(ScreenStack),
    Subpages(SubpageStack),
}

/// Everything needed to finish a navigation once its content is loaded.
struct Plan {
    token: RequestToken,
    target: ContentPath,
    previous: Option<ContentPath>,
    direction: Direction,
    effect: Effect,
    pending: Pending,
}

/// Owns the navigation state and drives loads for both axes.
pub struct Navigator<L> {
    loader: L,
    state: Mutex<NavigationState>,
    content: ContentConfig,
    transition: TransitionConfig,
    renderer: UnboundedSender<RenderEvent>,
}

impl<L: Loader> Navigator<L> {
    /// Creates a navigator with empty stacks.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidName`] if the configured default subpage does not
    /// resolve to a content path.
    pub fn new(
        loader: L,
        config: &NavConfig,
        renderer: UnboundedSender<RenderEvent>,
    ) -> NavResult<Self> {
        let state = NavigationState::new(config.default_subpage_path()?);
        Ok(Self {
            loader,
            state: Mutex::new(state),
            content: config.content.clone(),
            transition: config.transition.clone(),
            renderer,
        })
    }

    /// Returns a copy of the committed state.
    pub fn snapshot(&self) -> NavigationState {
        self.lock().clone()
    }

    pub fn current_screen(&self) -> Option<ContentPath> {
        self.lock().screens().current().cloned()
    }

    pub fn current_subpage(&self) -> Option<ContentPath> {
        self.lock().subpages().current().cloned()
    }

    /// Abandons whatever is loading on `axis`. Its completion will report
    /// [`Outcome::Cancelled`] and change nothing.
    pub fn cancel(&self, axis: Axis) -> bool {
        let cancelled = self.lock().cancel(axis);
        if cancelled {
            tracing::debug!("cancelled in-flight {axis} navigation");
        }
        cancelled
    }

    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// [`NavError::ContentNotFound`] (or a transport/I/O error) when the
    /// target cannot be loaded, after the tentative mutation has been rolled
    /// back. [`NavError::InvalidName`] if a pushed name cannot be resolved.
    pub async fn request(&self, command: NavigationCommand) -> NavResult<Outcome> {
        let axis = command.axis();
        let plan = match self.plan(command)? {
            Ok(plan) => plan,
            Err(outcome) => return Ok(outcome),
        };

        // Releases the axis if this future is dropped mid-load.
        let _release = Release {
            state: &self.state,
            token: plan.token,
        };

        tracing::debug!("loading {} for {axis} navigation", plan.target);
        match self.load(&plan.target).await {
            Ok(content) => Ok(self.commit(plan, content)),
            Err(e) => {
                let stale = {
                    let mut state = self.lock();
                    let stale = !state.is_current(plan.token);
                    state.finish(plan.token);
                    stale
                };
                if stale {
                    return Ok(Outcome::Cancelled(axis));
                }
                tracing::warn!("failed to load {}: {e}", plan.target);
                Err(e)
            }
        }
    }

    /// Resolves the target and the tentative stack. The outer error is a
    /// real failure; the inner `Err` is an outcome that needs no loading.
    fn plan(&self, command: NavigationCommand) -> NavResult<Result<Plan, Outcome>> {
        let axis = command.axis();
        let direction = command.direction();
        let target_name = match &command {
            NavigationCommand::PushScreen { name, .. } | NavigationCommand::PushSubpage(name) => {
                Some(self.content.resolve(name)?)
            }
            _ => None,
        };

        let mut state = self.lock();
        if matches!(command, NavigationCommand::PushSubpage(_)) && state.screens().is_empty() {
            tracing::debug!("no screen to host subpage; rejecting {command:?}");
            return Ok(Err(Outcome::NoScreen));
        }
        let Some(token) = state.begin(axis) else {
            tracing::debug!("{axis} navigation already loading; rejecting {command:?}");
            return Ok(Err(Outcome::Busy(axis)));
        };

        let screen_effect = self.transition.screen_effect;
        let planned = match (command, target_name) {
            (NavigationCommand::PushScreen { effect, .. }, Some(target)) => Some((
                target.clone(),
                state.screens().current().cloned(),
                effect.unwrap_or(screen_effect),
                Pending::Screens(state.screens().push(target)),
            )),
            (NavigationCommand::PopScreen, _) => {
                state.screens().pop().map(|(screens, target)| {
                    (
                        target,
                        state.screens().current().cloned(),
                        screen_effect,
                        Pending::Screens(screens),
                    )
                })
            }
            (NavigationCommand::PushSubpage(_), Some(target)) => {
                let subpages = state.subpages().push(target.clone());
                let below = subpages.iter().rev().nth(1).cloned();
                Some((target, below, Effect::Slide, Pending::Subpages(subpages)))
            }
            (NavigationCommand::PopSubpage(count), _) => {
                let (subpages, top) = state.subpages().pop(count);
                top.map(|target| {
                    (
                        target,
                        state.subpages().current().cloned(),
                        Effect::Slide,
                        Pending::Subpages(subpages),
                    )
                })
            }
            (NavigationCommand::FirstSubpage, _) => {
                state.subpages().rewind().map(|(subpages, target)| {
                    (
                        target,
                        state.subpages().current().cloned(),
                        Effect::Slide,
                        Pending::Subpages(subpages),
                    )
                })
            }
            _ => None,
        };

        let Some((target, previous, effect, pending)) = planned else {
            state.finish(token);
            return Ok(Err(Outcome::NoPrevious(axis)));
        };

        Ok(Ok(Plan {
            token,
            target,
            previous,
            direction,
            effect,
            pending,
        }))
    }

    async fn load(&self, target: &ContentPath) -> NavResult<Content> {
        if !self.loader.probe(target).await {
            return Err(NavError::ContentNotFound(target.to_string()));
        }
        self.loader.fetch(target).await
    }

    fn commit(&self, plan: Plan, content: Content) -> Outcome {
        let axis = plan.token.axis();
        let committed = {
            let mut state = self.lock();
            match plan.pending {
                Pending::Screens(screens) => state.commit_screens(plan.token, screens),
                Pending::Subpages(subpages) => state.commit_subpages(plan.token, subpages),
            }
        };
        if !committed {
            tracing::debug!("dropping stale {axis} load of {}", plan.target);
            return Outcome::Cancelled(axis);
        }

        tracing::info!("{axis} -> {} ({:?})", plan.target, plan.direction);

        let duration = match axis {
            Axis::Screen => self.transition.cleanup_delay(),
            Axis::Subpage => self.transition.subpage_duration(),
        };
        self.emit(RenderEvent::Transition {
            axis,
            content,
            transition: Transition::new(plan.direction, plan.effect, duration),
        });
        if let Some(previous) = plan.previous.filter(|p| *p != plan.target) {
            self.schedule_removal(axis, previous, self.transition.cleanup_delay());
        }

        Outcome::Committed {
            axis,
            path: plan.target,
            direction: plan.direction,
        }
    }

    fn schedule_removal(&self, axis: Axis, path: ContentPath, after: Duration) {
        let renderer = self.renderer.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = renderer.send(RenderEvent::RemoveStale { axis, path });
        });
    }

    fn emit(&self, event: RenderEvent) {
        if self.renderer.send(event).is_err() {
            tracing::debug!("renderer channel closed; dropping event");
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavigationState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<NavigationState>) -> MutexGuard<'_, NavigationState> {
    // State is only ever replaced wholesale, so a poisoned value is intact.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Returns an axis to Idle when a request ends without committing.
///
/// After a commit or rollback the token is no longer current and
/// [`NavigationState::finish`] ignores it.
struct Release<'a> {
    state: &'a Mutex<NavigationState>,
    token: RequestToken,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        lock_state(self.state).finish(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
    use tokio::sync::Notify;

    use crate::loader::MemoryLoader;
    use crate::nav::state::Phase;
    use crate::transition::TransitionKind;

    fn pages() -> MemoryLoader {
        MemoryLoader::new()
            .with_page("screens/connect.html", "<div id=\"connect\"></div>")
            .with_page("screens/control.html", "<div id=\"control\"></div>")
            .with_page("screens/settings.html", "<div id=\"settings\"></div>")
            .with_page("screens/about.html", "<div id=\"about\"></div>")
    }

    fn navigator<L: Loader>(loader: L) -> (Navigator<L>, UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = unbounded_channel();
        let nav = Navigator::new(loader, &NavConfig::default(), tx).unwrap();
        (nav, rx)
    }

    fn p(s: &str) -> ContentPath {
        ContentPath::new(s)
    }

    #[tokio::test]
    async fn push_and_pop_screens() {
        let (nav, _rx) = navigator(pages());

        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));

        nav.request(NavigationCommand::push_screen("control")).await.unwrap();
        assert_eq!(nav.current_screen(), Some(p("screens/control.html")));

        let outcome = nav.request(NavigationCommand::PopScreen).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Committed {
                axis: Axis::Screen,
                path: p("screens/connect.html"),
                direction: Direction::Reverse,
            }
        );
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));
    }

    #[tokio::test]
    async fn missing_screen_rolls_back() {
        let (nav, mut rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        let _ = rx.recv().await;

        let err = nav
            .request(NavigationCommand::push_screen("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, NavError::ContentNotFound(ref p) if p == "screens/missing.html"));
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));
        assert_eq!(nav.snapshot().screens().depth(), 1);
        assert!(rx.try_recv().is_err());

        // The axis is usable again after a failure.
        let outcome = nav.request(NavigationCommand::push_screen("control")).await.unwrap();
        assert!(outcome.is_committed());
    }

    #[tokio::test]
    async fn pop_at_root_reports_no_previous() {
        let (nav, _rx) = navigator(pages());
        assert_eq!(
            nav.request(NavigationCommand::PopScreen).await.unwrap(),
            Outcome::NoPrevious(Axis::Screen)
        );

        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        assert_eq!(
            nav.request(NavigationCommand::PopScreen).await.unwrap(),
            Outcome::NoPrevious(Axis::Screen)
        );
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));
    }

    #[tokio::test]
    async fn invalid_name_is_error_and_leaves_axis_idle() {
        let (nav, _rx) = navigator(pages());
        let err = nav
            .request(NavigationCommand::push_screen("../etc/passwd"))
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::InvalidName(_)));
        assert!(nav
            .request(NavigationCommand::push_screen("connect"))
            .await
            .unwrap()
            .is_committed());
    }

    #[tokio::test]
    async fn screen_change_clears_subpages() {
        let (nav, _rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("control")).await.unwrap();
        assert_eq!(nav.snapshot().subpages().depth(), 2);

        nav.request(NavigationCommand::push_screen("settings")).await.unwrap();
        assert!(nav.snapshot().subpages().is_empty());
    }

    #[tokio::test]
    async fn first_subpage_push_synthesizes_base() {
        let (nav, _rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("control")).await.unwrap();

        let state = nav.snapshot();
        let entries: Vec<&str> = state.subpages().iter().map(ContentPath::as_str).collect();
        assert_eq!(entries, vec!["screens/connect.html", "screens/control.html"]);
    }

    #[tokio::test]
    async fn pop_subpages_and_rewind() {
        let (nav, _rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("control")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("settings")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("about")).await.unwrap();
        assert_eq!(nav.snapshot().subpages().depth(), 4);

        let outcome = nav.request(NavigationCommand::PopSubpage(2)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Committed {
                axis: Axis::Subpage,
                path: p("screens/control.html"),
                direction: Direction::Reverse,
            }
        );

        nav.request(NavigationCommand::push_subpage("about")).await.unwrap();
        let outcome = nav.request(NavigationCommand::FirstSubpage).await.unwrap();
        assert!(outcome.is_committed());
        assert_eq!(nav.current_subpage(), Some(p("screens/connect.html")));
        assert_eq!(nav.snapshot().subpages().depth(), 1);
    }

    #[tokio::test]
    async fn popping_every_subpage_is_no_previous() {
        let (nav, _rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        nav.request(NavigationCommand::push_subpage("control")).await.unwrap();

        let outcome = nav.request(NavigationCommand::PopSubpage(5)).await.unwrap();
        assert_eq!(outcome, Outcome::NoPrevious(Axis::Subpage));
        assert_eq!(nav.snapshot().subpages().depth(), 2);
    }

    #[tokio::test]
    async fn missing_subpage_leaves_stack_untouched() {
        let (nav, _rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        let err = nav
            .request(NavigationCommand::push_subpage("nowhere"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(nav.snapshot().subpages().is_empty());
    }

    #[tokio::test]
    async fn subpage_without_screen_is_rejected() {
        let (nav, _rx) = navigator(pages());
        let outcome = nav
            .request(NavigationCommand::push_subpage("control"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoScreen);
        assert!(nav.snapshot().subpages().is_empty());
        assert_eq!(nav.snapshot().phase(Axis::Subpage), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn commit_emits_transition_then_cleanup() {
        let (nav, mut rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        match rx.recv().await.unwrap() {
            RenderEvent::Transition {
                axis,
                content,
                transition,
            } => {
                assert_eq!(axis, Axis::Screen);
                assert_eq!(content.path, p("screens/connect.html"));
                assert_eq!(transition.kind, TransitionKind::SlideForward);
                assert_eq!(transition.effect, Effect::Slide);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        nav.request(NavigationCommand::push_subpage("control")).await.unwrap();
        match rx.recv().await.unwrap() {
            RenderEvent::Transition { axis, transition, .. } => {
                assert_eq!(axis, Axis::Subpage);
                assert_eq!(transition.duration_ms, 250);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // Paused clock auto-advances to the scheduled removal.
        assert_eq!(
            rx.recv().await.unwrap(),
            RenderEvent::RemoveStale {
                axis: Axis::Subpage,
                path: p("screens/connect.html"),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reverse_navigation_slides_back_with_effect_override() {
        let (nav, mut rx) = navigator(pages());
        nav.request(NavigationCommand::push_screen("connect")).await.unwrap();
        nav.request(NavigationCommand::PushScreen {
            name: "control".to_string(),
            effect: Some(Effect::Fade),
        })
        .await
        .unwrap();
        nav.request(NavigationCommand::PopScreen).await.unwrap();

        let mut transitions = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let RenderEvent::Transition { transition, .. } = event {
                transitions.push(transition);
            }
        }
        assert_eq!(transitions.len(), 3);
        assert_eq!(transitions[1].effect, Effect::Fade);
        assert_eq!(transitions[2].kind, TransitionKind::SlideBack);
        assert_eq!(transitions[2].effect, Effect::Slide);
    }

    /// Loader whose fetches wait until released, to hold an axis in Loading.
    struct GatedLoader {
        inner: MemoryLoader,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Loader for GatedLoader {
        async fn probe(&self, path: &ContentPath) -> bool {
            self.inner.probe(path).await
        }

        async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
            self.gate.notified().await;
            self.inner.fetch(path).await
        }
    }

    fn gated() -> (GatedLoader, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            GatedLoader {
                inner: pages(),
                gate: gate.clone(),
            },
            gate,
        )
    }

    #[tokio::test]
    async fn second_request_on_loading_axis_is_busy() {
        let (loader, gate) = gated();
        let (nav, _rx) = navigator(loader);
        let nav = Arc::new(nav);

        let first = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_screen("connect")).await }
        });
        tokio::task::yield_now().await;

        let second = nav
            .request(NavigationCommand::push_screen("control"))
            .await
            .unwrap();
        assert_eq!(second, Outcome::Busy(Axis::Screen));

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(first.is_committed());
        assert_eq!(nav.current_screen(), Some(p("screens/connect.html")));
    }

    /// Commits `name` through a gated loader.
    async fn open_screen(nav: &Arc<Navigator<GatedLoader>>, gate: &Notify, name: &str) {
        let task = tokio::spawn({
            let nav = nav.clone();
            let name = name.to_string();
            async move { nav.request(NavigationCommand::push_screen(name)).await }
        });
        tokio::task::yield_now().await;
        gate.notify_one();
        assert!(task.await.unwrap().unwrap().is_committed());
    }

    #[tokio::test]
    async fn other_axis_is_not_blocked() {
        let (loader, gate) = gated();
        let (nav, _rx) = navigator(loader);
        let nav = Arc::new(nav);
        open_screen(&nav, &gate, "connect").await;

        let subpage = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_subpage("control")).await }
        });
        tokio::task::yield_now().await;

        let screen = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_screen("settings")).await }
        });
        tokio::task::yield_now().await;

        let state = nav.snapshot();
        assert_eq!(state.phase(Axis::Subpage), Phase::Loading);
        assert_eq!(state.phase(Axis::Screen), Phase::Loading);

        // Waiters are released in the order they started waiting.
        gate.notify_one();
        assert!(subpage.await.unwrap().unwrap().is_committed());
        gate.notify_one();
        assert!(screen.await.unwrap().unwrap().is_committed());
    }

    #[tokio::test]
    async fn cancelled_request_changes_nothing() {
        let (loader, gate) = gated();
        let (nav, mut rx) = navigator(loader);
        let nav = Arc::new(nav);

        let pending = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_screen("connect")).await }
        });
        tokio::task::yield_now().await;

        assert!(nav.cancel(Axis::Screen));
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), Outcome::Cancelled(Axis::Screen));
        assert!(nav.current_screen().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn screen_commit_cancels_loading_subpage() {
        let (loader, gate) = gated();
        let (nav, _rx) = navigator(loader);
        let nav = Arc::new(nav);
        open_screen(&nav, &gate, "connect").await;

        let screen = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_screen("settings")).await }
        });
        tokio::task::yield_now().await;

        let subpage = tokio::spawn({
            let nav = nav.clone();
            async move { nav.request(NavigationCommand::push_subpage("control")).await }
        });
        tokio::task::yield_now().await;

        // Waiters are released in the order they started waiting.
        gate.notify_one();
        assert!(screen.await.unwrap().unwrap().is_committed());

        gate.notify_one();
        assert_eq!(
            subpage.await.unwrap().unwrap(),
            Outcome::Cancelled(Axis::Subpage)
        );
        assert!(nav.snapshot().subpages().is_empty());
    }

    /// Loader whose fetches take `delay` on the tokio clock.
    struct SlowLoader {
        inner: MemoryLoader,
        delay: Duration,
    }

    #[async_trait]
    impl Loader for SlowLoader {
        async fn probe(&self, path: &ContentPath) -> bool {
            self.inner.probe(path).await
        }

        async fn fetch(&self, path: &ContentPath) -> NavResult<Content> {
            tokio::time::sleep(self.delay).await;
            self.inner.fetch(path).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_request_releases_axis() {
        let (nav, _rx) = navigator(SlowLoader {
            inner: pages(),
            delay: Duration::from_secs(60),
        });

        let timed_out = tokio::time::timeout(
            Duration::from_secs(1),
            nav.request(NavigationCommand::push_screen("connect")),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(nav.snapshot().phase(Axis::Screen), Phase::Idle);
        assert!(nav.current_screen().is_none());

        let outcome = nav
            .request(NavigationCommand::push_screen("control"))
            .await
            .unwrap();
        assert!(outcome.is_committed());
        assert_eq!(nav.current_screen(), Some(p("screens/control.html")));
    }
}
