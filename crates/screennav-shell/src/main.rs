//! screennav-shell: drives the screennav navigator from a command stream.
//!
//! Usage: `screennav-shell [config.toml]`
//!
//! Commands are read from stdin (type `help` for the list). Renderer events
//! are written to stdout as JSON lines; logs go to stderr and are filtered
//! with `RUST_LOG`.

mod app;
mod input;
mod render;

use std::path::PathBuf;

use screennav_core::NavConfig;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screennav_core=debug,screennav_shell=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            NavConfig::load(&path)?
        }
        None => NavConfig::default(),
    };

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = app::run(config, stdin, tokio::io::stdout()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
