//! Tracing configuration for KilnGuide
//!
//! Installs the global `tracing-subscriber` registry: an env-filter, a
//! stdout fmt layer and, when the log directory is writable, a daily
//! rolling file layer.
//!
//! ## Call this / 调用位置
//!
//! Once, before the orchestrator is wired:
//!
//! ```ignore
//! let config = kilnguide::bootstrap::config::load_or_default(None)?;
//! kilnguide::init_tracing_subscriber(&config.log_dir, &config.log_level)?;
//! ```

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "kilnguide.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives
///
/// ## Behavior / 行为
/// - A non-empty `level` from config wins over the build default
/// - **Development**: debug for the walkthrough crates
/// - **Production**: info; surface echo lines stay at info either way
fn build_filter_directives(is_dev: bool, level: &str) -> Vec<String> {
    let base = if !level.trim().is_empty() {
        level.trim().to_string()
    } else if is_dev {
        "debug".to_string()
    } else {
        "info".to_string()
    };

    vec![
        base,
        if is_dev { "kg_app=debug" } else { "kg_app=info" }.to_string(),
        if is_dev { "kg_infra=debug" } else { "kg_infra=info" }.to_string(),
        "kilnguide::surface=info".to_string(),
    ]
}

/// Initialize the tracing subscriber
///
/// - `RUST_LOG` overrides everything when set
/// - File logging failures fall back to stdout only
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(log_dir: &Path, level: &str) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development(), level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match build_file_writer(log_dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    // "2026-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stdout_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    if log_dir.as_os_str().is_empty() {
        anyhow::bail!("no log directory configured");
    }
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
