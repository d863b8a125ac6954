// salesflow/src/logging.rs
//
// One plain-text log file per job, appended to on every run.
// RUST_LOG=debug salesflow train ... pour voir les détails

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Installs the global subscriber writing to `<logs_dir>/<file_name>`.
///
/// The returned guard flushes pending lines when dropped; keep it alive until
/// the command has finished.
pub fn init(logs_dir: &Path, file_name: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(logs_dir)
        .with_context(|| format!("Failed to open log file in {}", logs_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    let subscriber = Registry::default().with(build_env_filter()).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install global tracing subscriber")?;

    Ok(guard)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
