//! Logging setup for the tabscope binary.
//!
//! Console output always goes to stderr so JSON reports on stdout stay clean.
//! When a log directory is available, two daily-rotating files are written too:
//!
//! - `tabscope.<date>.log`: everything the filter lets through
//! - `error.<date>.log`: warnings and errors only
//!
//! The level defaults to `info` and can be overridden with `RUST_LOG`.
//!
//! ```no_run
//! use tabscope::logging;
//!
//! logging::init(None).expect("Failed to initialize logging");
//! tracing::info!("Profiler ready");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const MAX_LOG_FILES: usize = 10;

/// Platform data directory plus `tabscope/logs`, e.g. `~/.local/share/tabscope/logs` on Linux.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|base| base.join("tabscope").join("logs"))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    Ok(())
}

fn rolling_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create '{prefix}' file appender"))
}

/// Installs the global subscriber. Call once, before any profiling work.
///
/// With `log_dir` set, file logging is written there; otherwise only stderr is used.
///
/// # Errors
///
/// Fails if the log directory cannot be created or an appender cannot be opened.
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(());
    };

    ensure_dir(dir)?;

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(rolling_appender(dir, "tabscope")?);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(rolling_appender(dir, "error")?)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .init();

    tracing::debug!(log_dir = %dir.display(), "File logging enabled");
    Ok(())
}
