//! Logging
//!
//! Sets up `tracing` with:
//! - a daily rolling JSON file log (non-blocking writer)
//! - `log` crate events redirected into `tracing`
//! - miette report rendering for fatal errors
//!
//! Search failures never surface as errors in the controller; the warning
//! logged by the client is the full record of them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix of the rolling log.
pub const LOG_FILE_NAME: &str = "catalog-search.log";

/// Filter from `RUST_LOG`, or `default_level` when unset or invalid.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn ensure_log_dir(log_dir: &Path) {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
        }
    }
}

fn file_writer(log_dir: &Path) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    ensure_log_dir(log_dir);
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    tracing_appender::non_blocking(file_appender)
}

/// Initialize logging for TUI mode.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown. Installing the
/// subscriber also installs the `LogTracer` bridge (the `tracing-log`
/// feature), so `log` records land in the same file.
pub fn init_tui(log_dir: PathBuf, default_level: &str) -> WorkerGuard {
    let (non_blocking, guard) = file_writer(&log_dir);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter(default_level));

    // No stdout layer: the TUI owns the terminal
    tracing_subscriber::registry().with(file_layer).init();

    init_miette();

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}
