use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Time source for the engine.
pub trait Clock {
    /// Monotonic time, used for limits and throughput.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, stamped on records.
    fn wall_ms(&self) -> u64;
}

/// [Clock] backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}
