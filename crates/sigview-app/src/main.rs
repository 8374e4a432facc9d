//! sigview: GPU-rendered signal table configurator
//!
//! Main entry point. Sets up logging, then hands control to the
//! windowed run loop until it terminates.

mod app;
mod lifecycle;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    info!("sigview starting...");

    app::run()?;

    info!("sigview shutting down");
    Ok(())
}
