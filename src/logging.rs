// File logging through tracing. The TUI owns the terminal, so every event
// goes to `radiolume.log` in the configured directory instead.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE: &str = "radiolume.log";

/// `<data_dir>/radiolume`, or `./radiolume` without a platform data dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("radiolume")
}

/// Install the global subscriber, writing to `log_dir` (or the default).
/// Keep the returned guard alive until exit; dropping it flushes the writer.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir.map_or_else(default_log_dir, Path::to_path_buf);
    std::fs::create_dir_all(&dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::never(&dir, LOG_FILE));
    let filter = EnvFilter::from_default_env().add_directive("radiolume=debug".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .with(filter)
        .try_init()?;

    tracing::debug!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}
