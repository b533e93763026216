//! Periodic logging of registered value sources.
//!
//! The engine never discovers what to log. Types that own loggable state
//! implement [`LogSource`] and push their `(name, value)` pairs through the
//! regular `log` calls; [`AutoLogManager`] polls every registered source
//! once per [`periodic`](AutoLogManager::periodic) tick.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::LogEngine;
use crate::error::Result;

/// Something that knows how to log its own state.
pub trait LogSource: Send + Sync {
    fn log_to(&self, engine: &LogEngine) -> Result<()>;
}

impl<F> LogSource for F
where
    F: Fn(&LogEngine) -> Result<()> + Send + Sync,
{
    fn log_to(&self, engine: &LogEngine) -> Result<()> {
        self(engine)
    }
}

/// Registry of sources logged together on every tick.
#[derive(Default)]
pub struct AutoLogManager {
    sources: Mutex<Vec<Arc<dyn LogSource>>>,
}

impl AutoLogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, source: Arc<dyn LogSource>) {
        self.sources.lock().push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logs every source in registration order, stopping at the first error.
    pub fn periodic(&self, engine: &LogEngine) -> Result<()> {
        let sources = self.sources.lock().clone();
        for source in &sources {
            source.log_to(engine)?;
        }
        Ok(())
    }
}

/// Logs each expression under `<prefix>/<expression>`.
///
/// Evaluates to `Result<()>`, stopping at the first failed write.
///
/// # Examples
///
/// ```no_run
/// # use wpilog_logger::{LogEngine, log_fields};
/// # fn main() -> wpilog_logger::Result<()> {
/// let engine = LogEngine::in_dir("/tmp/logs");
/// engine.setup("run.wpilog")?;
///
/// let speed = 1.5;
/// let enabled = true;
/// // Logs "/Drive/speed" and "/Drive/enabled"
/// log_fields!(engine, "/Drive", false; speed, enabled)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! log_fields {
    ($engine:expr, $prefix:expr, $post:expr; $($field:expr),+ $(,)?) => {{
        (|| -> $crate::Result<()> {
            $(
                $engine.log(
                    &format!("{}/{}", $prefix, stringify!($field)),
                    $field.clone(),
                    $post,
                )?;
            )+
            Ok(())
        })()
    }};
}
