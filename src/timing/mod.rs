mod clock;
mod time_source;

pub use clock::{Clock, Tick, TickHandlerId};
pub use time_source::{SystemTime, TimeSource};

#[cfg(test)]
pub(crate) mod manual_time;
