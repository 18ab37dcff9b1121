use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logs to stdout and appends to `log_file`. Keep the returned guard alive
/// until the run ends or buffered file lines are lost.
pub fn init_tracing(log_file: &Path) -> Result<WorkerGuard> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::new("info"),
    };

    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file `{}` has no file name", log_file.display()))?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create log directory `{}`", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("could not install the log subscriber")?;

    Ok(guard)
}
