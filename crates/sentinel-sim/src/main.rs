//! Command-line entry point for the Sentinel simulator.
//!
//! ```text
//! sentinel-sim [scenario.toml]          run a scenario (defaults to sentinel.toml)
//! sentinel-sim --init [scenario.toml]   write the default scenario and exit
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use sentinel_sim::{run, SimConfig, CONFIG_FILE};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing; SENTINEL_LOG_JSON switches to JSON lines
    let filter = EnvFilter::from_default_env().add_directive("sentinel=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var_os("SENTINEL_LOG_JSON").is_some() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    info!("Sentinel simulator starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--init") {
        let path = args.next().map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
        SimConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let path = first.map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = SimConfig::load_from(&path);
    let summary = run(&config).context("running scenario")?;

    info!(
        ticks = summary.ticks,
        elapsed = summary.elapsed,
        transitions = summary.transitions,
        sightings = summary.sightings,
        noises = summary.noises_claimed,
        strikes = summary.strikes_landed,
        "Run complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Sentinel simulator shutdown complete");
    Ok(())
}
