use std::time::{Duration, Instant};

/// Session time base for record timestamps.
///
/// Timestamps are microsecond offsets from the moment the current session
/// started. The origin is an [`Instant`], so offsets never go backwards even
/// if the wall clock is adjusted while logging.
///
/// # Examples
///
/// ```
/// # use wpilog_logger::time_base::TimeBase;
/// let mut clock = TimeBase::new();
/// let first = clock.now();
/// let second = clock.now();
/// assert!(second >= first);
///
/// // A new session starts counting from zero again
/// clock.start();
/// assert!(clock.now() < 1_000_000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    origin: Instant,
}

impl TimeBase {
    /// Creates a time base whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Resets the origin to the current instant.
    ///
    /// Offsets returned before a reset are meaningless afterwards.
    pub fn start(&mut self) {
        self.origin = Instant::now();
    }

    /// Microseconds elapsed since the origin.
    #[inline]
    pub fn now(&self) -> u64 {
        to_micros(self.origin.elapsed())
    }

    /// The instant the current session started.
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Saturates instead of wrapping for durations beyond `u64::MAX` micros.
#[inline]
fn to_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
