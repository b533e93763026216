//! Engine and diagnostics configuration.
//!
//! Both configs have sensible defaults and can be overridden from the
//! environment:
//! - `WPILOG_EXTRA_HEADER`, `WPILOG_BUFFER_BYTES` for the engine
//! - `WPILOG_DIAG_LEVEL`, `WPILOG_DIAG_DIR` for diagnostics

use std::env;
use std::path::PathBuf;

/// Default sink buffer size in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// File extension of generated log names.
pub const LOG_FILE_EXTENSION: &str = "wpilog";

/// Settings applied when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Free-form string stored in the file header.
    pub extra_header: String,
    /// Size of the in-memory buffer in front of the sink. Zero writes every
    /// record straight through.
    ///
    /// While records sit in the buffer, a sink failure is only seen when the
    /// buffer spills, so the error comes back from a later `log`, `flush` or
    /// `close` call rather than the one whose record was lost.
    pub buffer_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extra_header: String::new(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `WPILOG_EXTRA_HEADER` and `WPILOG_BUFFER_BYTES`.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(extra) = env::var("WPILOG_EXTRA_HEADER") {
            config.extra_header = extra;
        }
        if let Some(capacity) = env::var("WPILOG_BUFFER_BYTES")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.buffer_capacity = capacity;
        }
        config
    }

    pub fn with_extra_header(mut self, extra: impl Into<String>) -> Self {
        self.extra_header = extra.into();
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}

/// File name for a session started now, e.g. `2026-10-19_14-03-59.wpilog`.
pub fn default_file_name() -> String {
    format!(
        "{}.{}",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"),
        LOG_FILE_EXTENSION
    )
}

/// Settings for the engine's own diagnostics output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info`.
    pub level: String,
    /// Write daily-rotated files here instead of stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl DiagnosticsConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = env::var("WPILOG_DIAG_LEVEL") {
            if !level.trim().is_empty() {
                config.level = level.trim().to_lowercase();
            }
        }
        if let Ok(dir) = env::var("WPILOG_DIAG_DIR") {
            if !dir.is_empty() {
                config.log_dir = Some(PathBuf::from(dir));
            }
        }
        config
    }
}
