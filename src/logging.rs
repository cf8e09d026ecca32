//! Logging infrastructure for gpo-export
//!
//! Progress goes to stderr and to gpo-export.log, by default in the
//! executable's directory. When the log file cannot be opened the run
//! continues with stderr only.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "gpo-export.log";

/// Get the directory containing the executable
fn get_executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Open gpo-export.log in `log_dir`, creating the directory if needed
pub fn open_log_file(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
}

/// Initialize logging to stderr and to gpo-export.log in `log_dir`
/// (or the executable's directory when not given).
///
/// Returns a guard that must be kept alive for the duration of the program
/// to ensure all logs are flushed to disk. `None` means the file could not
/// be opened and only stderr is logged.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let log_dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(get_executable_dir);

    let (file_layer, guard, file_error) = match open_log_file(&log_dir) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            dir = %log_dir.display(),
            error = %e,
            "Cannot open log file, logging to stderr only"
        );
    }

    guard
}
