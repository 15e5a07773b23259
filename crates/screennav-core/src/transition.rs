//! Transition requests handed to the renderer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Whether a navigation moves deeper into history or back out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

/// Slide direction derived from [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    SlideForward,
    SlideBack,
}

impl From<Direction> for TransitionKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => TransitionKind::SlideForward,
            Direction::Reverse => TransitionKind::SlideBack,
        }
    }
}

/// Visual effect for screen changes. Subpages always slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    Slide,
    Fade,
    Pop,
    None,
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slide" => Ok(Effect::Slide),
            "fade" => Ok(Effect::Fade),
            "pop" => Ok(Effect::Pop),
            "none" => Ok(Effect::None),
            other => Err(format!("unknown effect: {other}")),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Effect::Slide => "slide",
            Effect::Fade => "fade",
            Effect::Pop => "pop",
            Effect::None => "none",
        };
        f.write_str(name)
    }
}

/// A single animation the renderer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub effect: Effect,
    pub duration_ms: u64,
}

impl Transition {
    pub fn new(direction: Direction, effect: Effect, duration: Duration) -> Self {
        Self {
            kind: direction.into(),
            effect,
            duration_ms: duration.as_millis() as u64,
        }
    }
}
