use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the level chosen by `--verbose`.
pub const LOG_ENV: &str = "GEMINI_MCP_LOG";

fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr(verbose: bool) {
    let subscriber = tracing_subscriber::registry().with(filter(verbose)).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false),
    );
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

/// Installs the global subscriber.
///
/// Logs never go to stdout, which carries the protocol. Without a log file
/// they are written to stderr; with one they are appended as JSON lines and
/// the returned guard must be held until exit to flush them. A log file that
/// cannot be opened falls back to stderr.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let Some(path) = log_file else {
        init_stderr(verbose);
        return None;
    };

    let file = match fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            init_stderr(verbose);
            tracing::warn!("Failed to open log file {}: {e}, logging to stderr", path.display());
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(filter(verbose)).with(
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return None;
    }

    tracing::info!("Logging to {}", path.display());

    Some(guard)
}
