//! Tracing subscriber setup
//!
//! The terminal belongs to the UI, so all diagnostics go to a log file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber writing to `log_file_path`
///
/// Filtering follows `RUST_LOG`, with DEBUG as the default level. Returns
/// false when the log file cannot be created; the program then runs without
/// logging.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };
    build_subscriber(log_file).try_init().is_ok()
}

/// Subscriber shared by the binary and tests
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy()
        // ureq logs every connection at debug
        .add_directive(
            "ureq=info"
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
