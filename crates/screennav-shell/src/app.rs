//! The shell's main loop.
//!
//! Reads commands line by line, runs navigations and lifecycle events as
//! background tasks (so a slow load does not block input, and a second
//! request on a loading axis is rejected as busy), and funnels renderer
//! events and state snapshots into a single output writer.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;

use screennav_core::{
    dispatch, ConfiguredLoader, LifecycleEvent, LifecycleHandler, LifecycleOutcome, NavConfig,
    NavError, NavigationCommand, Navigator, Outcome,
};

use crate::input::{parse_line, ShellInput, HELP};
use crate::render::{forward_events, state_line, write_lines};

type ShellNavigator = Navigator<ConfiguredLoader>;

/// Runs the shell until `quit`, end of input, or an exit reaction.
pub async fn run<R, W>(config: NavConfig, input: R, output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let loader = ConfiguredLoader::from_config(&config.loader)?;
    let (render_tx, render_rx) = mpsc::unbounded_channel();
    let navigator = Arc::new(Navigator::new(loader, &config, render_tx)?);
    let handler = Arc::new(LifecycleHandler::new(&config, &config.platform.tag)?);

    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let forwarder = tokio::spawn(forward_events(render_rx, line_tx.clone()));
    let writer = tokio::spawn(write_lines(line_rx, output));

    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<()>();
    let mut tasks = JoinSet::new();

    tracing::info!("screennav shell on {}", handler.platform());
    // Browsers have no device to wait for; the page is ready as soon as it loads.
    if !handler.platform().is_native() {
        tasks.spawn(lifecycle(
            navigator.clone(),
            handler.clone(),
            LifecycleEvent::DeviceReady,
            exit_tx.clone(),
        ));
    }

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = match parse_line(&line) {
                    Ok(Some(input)) => input,
                    Ok(None) => continue,
                    Err(msg) => {
                        tracing::warn!("{msg}");
                        continue;
                    }
                };
                match input {
                    ShellInput::Quit => break,
                    ShellInput::Help => eprintln!("{HELP}"),
                    ShellInput::State => {
                        let _ = line_tx.send(state_line(&navigator.snapshot())?);
                    }
                    ShellInput::Cancel(axis) => {
                        if !navigator.cancel(axis) {
                            tracing::info!("nothing loading on {axis}");
                        }
                    }
                    ShellInput::Navigate(command) => {
                        tasks.spawn(navigate(navigator.clone(), command));
                    }
                    ShellInput::Lifecycle(event) => {
                        tasks.spawn(lifecycle(
                            navigator.clone(),
                            handler.clone(),
                            event,
                            exit_tx.clone(),
                        ));
                    }
                }
            }
            Some(()) = exit_rx.recv() => break,
        }
    }

    while tasks.join_next().await.is_some() {}
    drop(navigator);
    drop(handler);
    forwarder.await?;
    drop(line_tx);
    writer.await??;
    Ok(())
}

async fn navigate(navigator: Arc<ShellNavigator>, command: NavigationCommand) {
    report(navigator.request(command).await);
}

async fn lifecycle(
    navigator: Arc<ShellNavigator>,
    handler: Arc<LifecycleHandler>,
    event: LifecycleEvent,
    exit: UnboundedSender<()>,
) {
    match dispatch(&handler, &navigator, event).await {
        Ok(LifecycleOutcome::Navigated(outcome)) => report(Ok(outcome)),
        Ok(LifecycleOutcome::Exit) => {
            let _ = exit.send(());
        }
        Ok(LifecycleOutcome::Suspend) => {
            tracing::info!("suspended; device sessions should be released");
        }
        Ok(LifecycleOutcome::Ignored) => tracing::debug!("{event:?} ignored"),
        Err(e) => report(Err(e)),
    }
}

fn report(result: Result<Outcome, NavError>) {
    match result {
        Ok(Outcome::Committed { axis, path, .. }) => tracing::debug!("{axis} now showing {path}"),
        Ok(Outcome::NoPrevious(axis)) => tracing::info!("no previous {axis}"),
        Ok(Outcome::NoScreen) => tracing::info!("load a screen before its subpages"),
        Ok(Outcome::Busy(axis)) => tracing::info!("{axis} navigation already in progress"),
        Ok(Outcome::Cancelled(axis)) => tracing::debug!("{axis} navigation cancelled"),
        // The navigator already logged the rollback.
        Err(e) if e.is_not_found() => {}
        Err(e) => tracing::error!("navigation failed: {e}"),
    }
}
