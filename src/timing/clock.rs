use super::time_source::{SystemTime, TimeSource};
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt::{Debug, Formatter};
use tokio::time::Instant;

/// Identifier handed out on tick handler registration.
pub type TickHandlerId = u64;

/// A single clock tick as delivered to the registered handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    now: DateTime<Utc>,
    elapsed: TimeDelta,
}

impl Tick {
    /// Current time of the shared time base.
    pub fn now(&self) -> DateTime<Utc> { self.now }
    /// Elapsed time of the clock at this tick.
    pub fn elapsed(&self) -> TimeDelta { self.elapsed }
}

/// Shared time base of a console.
///
/// The clock keeps two notions of time: `now()`, the time source reading
/// corrected by the offset to the backend's clock, and `elapsed()`, the
/// running time accumulated between `start()` and `stop()` calls. Elapsed
/// time never moves while stopped and never moves backwards while running;
/// it is measured on the monotonic reading of the time source, so wall clock
/// corrections only shift `now()`.
///
/// Observers register tick handlers that are called on every [`Clock::tick`].
/// The clock does not drive itself; the owning event loop waits
/// [`Clock::delay_to_next_tick`] and then calls `tick()`.
pub struct Clock {
    time_source: Box<dyn TimeSource>,
    /// Backend time minus local time.
    offset: TimeDelta,
    /// Monotonic reading at the last `start()`, `None` while stopped.
    running_since: Option<Instant>,
    /// Elapsed time of all completed running intervals.
    accumulated: TimeDelta,
    tick_handlers: Vec<(TickHandlerId, Box<dyn FnMut(&Tick)>)>,
    next_handler_id: TickHandlerId,
}

impl Clock {
    /// Tick cadence.
    pub const TICK_PERIOD: TimeDelta = TimeDelta::seconds(1);
    /// Boundaries closer than this are skipped, a tick waits for the next one.
    const MIN_TICK_DELAY: TimeDelta = TimeDelta::milliseconds(50);

    pub fn new(time_source: Box<dyn TimeSource>) -> Self {
        Self {
            time_source,
            offset: TimeDelta::zero(),
            running_since: None,
            accumulated: TimeDelta::zero(),
            tick_handlers: Vec::new(),
            next_handler_id: 0,
        }
    }

    /// Clock on the local system time.
    pub fn system() -> Self { Self::new(Box::new(SystemTime)) }

    pub fn now(&self) -> DateTime<Utc> { self.time_source.now() + self.offset }

    /// Aligns `now()` with the backend's clock. Elapsed time is unaffected.
    pub fn sync_to(&mut self, server_time: DateTime<Utc>) {
        self.offset = server_time - self.time_source.now();
    }

    pub fn offset(&self) -> TimeDelta { self.offset }

    pub fn is_running(&self) -> bool { self.running_since.is_some() }

    /// Starts advancing elapsed time from its current value. No-op if running.
    pub fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(self.time_source.instant());
        }
    }

    /// Freezes elapsed time. No-op if stopped.
    pub fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            let running = self.running_time(since);
            self.accumulated += running;
        }
    }

    /// Restarts the clock so that elapsed time counts from `epoch` on the
    /// shared time base. Before `epoch` elapsed time is negative.
    pub fn start_at(&mut self, epoch: DateTime<Utc>) {
        self.accumulated = self.now() - epoch;
        self.running_since = Some(self.time_source.instant());
    }

    fn running_time(&self, since: Instant) -> TimeDelta {
        let running = self.time_source.instant().saturating_duration_since(since);
        TimeDelta::from_std(running).unwrap_or(TimeDelta::MAX)
    }

    /// Elapsed running time, excluding paused intervals.
    pub fn elapsed(&self) -> TimeDelta {
        match self.running_since {
            Some(since) => self.accumulated + self.running_time(since),
            None => self.accumulated,
        }
    }

    /// Elapsed running time in milliseconds.
    pub fn elapsed_millis(&self) -> i64 { self.elapsed().num_milliseconds() }

    pub fn register_tick_handler<F>(&mut self, handler: F) -> TickHandlerId
    where F: FnMut(&Tick) + 'static {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        self.tick_handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a tick handler. Returns `false` if the id was unknown.
    pub fn unregister_tick_handler(&mut self, id: TickHandlerId) -> bool {
        let before = self.tick_handlers.len();
        self.tick_handlers.retain(|(h_id, _)| *h_id != id);
        before != self.tick_handlers.len()
    }

    pub fn tick_handler_count(&self) -> usize { self.tick_handlers.len() }

    /// Delivers a tick to every registered handler.
    pub fn tick(&mut self) -> Tick {
        let tick = Tick { now: self.now(), elapsed: self.elapsed() };
        for (_, handler) in &mut self.tick_handlers {
            handler(&tick);
        }
        tick
    }

    /// Time until the next whole second of `now()`.
    ///
    /// Recomputed for every tick so that ticks stay on second boundaries
    /// instead of drifting like a fixed interval would. A boundary less than
    /// [`Self::MIN_TICK_DELAY`] away is skipped, one tick per second.
    pub fn delay_to_next_tick(&self) -> std::time::Duration {
        let period_ms = Self::TICK_PERIOD.num_milliseconds();
        let into_period = i64::from(self.now().timestamp_subsec_millis()) % period_ms;
        let mut remaining = period_ms - into_period;
        if remaining < Self::MIN_TICK_DELAY.num_milliseconds() {
            remaining += period_ms;
        }
        std::time::Duration::from_millis(u64::try_from(remaining).unwrap_or(0))
    }
}

impl Debug for Clock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("offset", &self.offset)
            .field("running_since", &self.running_since)
            .field("accumulated", &self.accumulated)
            .field("tick_handlers", &self.tick_handlers.len())
            .finish()
    }
}
