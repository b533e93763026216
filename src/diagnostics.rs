//! Diagnostics output for the engine itself.
//!
//! The engine reports session lifecycle, entry creation and failures through
//! `tracing`. Applications that do not install their own subscriber can
//! call [`init_tracing`] once at startup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::DiagnosticsConfig;

/// File name prefix of rotated diagnostics files.
const DIAG_FILE_PREFIX: &str = "wpilog_logger.log";

/// Installs a global subscriber for the engine's diagnostics.
///
/// `RUST_LOG` takes precedence over `config.level`. With a `log_dir`, output
/// goes to a daily-rotated file through a non-blocking writer and the
/// returned guard must be kept alive to flush it. Returns `None` without a
/// file writer, or when a global subscriber is already installed.
pub fn init_tracing(config: &DiagnosticsConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, DIAG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .ok()
                .map(|_| guard)
        }
        None => {
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
            let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
            None
        }
    }
}
