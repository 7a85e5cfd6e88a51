use super::TimeSource;
use chrono::{DateTime, TimeDelta, Utc};
use std::cell::Cell;
use std::rc::Rc;
use tokio::time::Instant;

/// Hand-driven time source. Clones share the same instant.
///
/// `advance` moves wall and monotonic time together, going back only moves
/// the wall clock like a system clock correction would.
#[derive(Debug, Clone)]
pub(crate) struct ManualTime {
    now: Rc<Cell<DateTime<Utc>>>,
    origin: Instant,
    monotonic: Rc<Cell<std::time::Duration>>,
}

impl ManualTime {
    pub(crate) fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            origin: Instant::now(),
            monotonic: Rc::new(Cell::new(std::time::Duration::ZERO)),
        }
    }

    /// Sets the wall clock only.
    pub(crate) fn set(&self, t: DateTime<Utc>) { self.now.set(t); }

    pub(crate) fn advance(&self, dt: TimeDelta) {
        self.now.set(self.now.get() + dt);
        if let Ok(forward) = dt.to_std() {
            self.monotonic.set(self.monotonic.get() + forward);
        }
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> DateTime<Utc> { self.now.get() }
    fn instant(&self) -> Instant { self.origin + self.monotonic.get() }
}
