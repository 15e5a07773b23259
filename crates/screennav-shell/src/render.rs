//! JSON-lines output for an external renderer.
//!
//! Every [`RenderEvent`] becomes one JSON object per line on stdout; the
//! `state` command adds a snapshot line in the same format. Logging goes to
//! stderr so the two never interleave.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use screennav_core::{Axis, NavigationState, Phase, RenderEvent};

#[derive(Serialize)]
struct StateLine<'a> {
    event: &'static str,
    screens: Vec<&'a str>,
    subpages: Vec<&'a str>,
    screen_phase: Phase,
    subpage_phase: Phase,
}

/// Serializes a renderer event as a single JSON line (without newline).
pub fn event_line(event: &RenderEvent) -> anyhow::Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Serializes a navigation snapshot as a single JSON line (without newline).
pub fn state_line(state: &NavigationState) -> anyhow::Result<String> {
    let line = StateLine {
        event: "state",
        screens: state.screens().iter().map(|p| p.as_str()).collect(),
        subpages: state.subpages().iter().map(|p| p.as_str()).collect(),
        screen_phase: state.phase(Axis::Screen),
        subpage_phase: state.phase(Axis::Subpage),
    };
    Ok(serde_json::to_string(&line)?)
}

/// Converts renderer events to lines until every event sender is dropped.
pub async fn forward_events(
    mut events: UnboundedReceiver<RenderEvent>,
    lines: UnboundedSender<String>,
) {
    while let Some(event) = events.recv().await {
        match event_line(&event) {
            Ok(line) => {
                let _ = lines.send(line);
            }
            Err(e) => tracing::error!("failed to serialize render event: {e}"),
        }
    }
}

/// Writes lines to `out` until every line sender is dropped.
pub async fn write_lines<W>(mut lines: UnboundedReceiver<String>, mut out: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }
    Ok(())
}
