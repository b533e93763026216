use std::sync::Arc;

use crate::engine::LogEngine;
use crate::error::Result;
use crate::loggable::Loggable;

/// Wraps a value producer so every value it yields is also logged.
///
/// The returned closure calls `producer`, logs the result under `name` and
/// returns it. Useful for sensor reads that are polled from several places.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use wpilog_logger::{LogEngine, supplier};
/// # fn read_encoder() -> i64 { 0 }
/// let engine = Arc::new(LogEngine::in_dir("/tmp/logs"));
/// engine.setup("run.wpilog").unwrap();
///
/// let mut ticks = supplier::wrap(engine.clone(), "/Arm/Ticks", read_encoder, false);
/// let value = ticks().unwrap();
/// ```
pub fn wrap<T, F>(
    engine: Arc<LogEngine>,
    name: impl Into<String>,
    mut producer: F,
    post: bool,
) -> impl FnMut() -> Result<T>
where
    T: Loggable,
    F: FnMut() -> T,
{
    let name = name.into();
    move || engine.log(&name, producer(), post)
}
