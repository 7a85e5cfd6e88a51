use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Source of "now" for a [`Clock`](super::Clock).
///
/// Production code reads the system clock; tests drive time by hand.
pub trait TimeSource {
    /// Wall clock reading, may jump when the system clock is adjusted.
    fn now(&self) -> DateTime<Utc>;
    /// Monotonic reading for measuring running time.
    fn instant(&self) -> Instant;
}

/// Wall clock of the local machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> DateTime<Utc> { Utc::now() }
    fn instant(&self) -> Instant { Instant::now() }
}
