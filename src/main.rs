//! Headless walkthrough runner.
//!
//! `kilnguide [config.toml]` resumes saved progress, logs every surface call
//! and prints the resulting view as JSON.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use kilnguide::bootstrap::config::load_or_default;
use kilnguide::{init_tracing_subscriber, wire_headless};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_or_default(config_path)?;

    if let Err(err) = init_tracing_subscriber(&config.log_dir, &config.log_level) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let orchestrator = wire_headless(&config)?;
    let view = orchestrator
        .resume()
        .await
        .context("Failed to resume walkthrough")?;
    info!(stage = %view.active_stage, step = view.cursor.index(), "walkthrough resumed");

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
