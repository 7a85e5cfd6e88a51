use crate::http_handler::{Race, Scheduled};
use crate::sig;
use crate::start_sequence::{
    Flag, FlagState, Signal, StartSequence, format_signed_hms, race_countdown,
};
use crate::timing::Tick;
use chrono::{DateTime, Local, TimeDelta, Utc};
use std::fmt::{Display, Formatter};

/// Shown instead of a countdown once a flag has reached its final state.
const NO_CHANGE: &str = "--:--:--";
/// Number of upcoming signals listed below the flags.
const ACTION_ROWS: usize = 6;
/// Number of announced signals kept on screen.
const ANNOUNCED_ROWS: usize = 3;

/// Current state of one flag and the time until it changes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagIndicator {
    flag: Flag,
    state: FlagState,
    next_change: Option<TimeDelta>,
}

impl FlagIndicator {
    pub fn new(sequence: &StartSequence, flag: &Flag, now: DateTime<Utc>) -> Self {
        Self {
            flag: flag.clone(),
            state: sequence.flag_state(flag, now),
            next_change: sequence.time_to_next_change(flag, now),
        }
    }

    pub fn flag(&self) -> &Flag { &self.flag }
    pub fn state(&self) -> FlagState { self.state }
    pub fn next_change(&self) -> Option<TimeDelta> { self.next_change }
}

impl Display for FlagIndicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let countdown = self.next_change.map_or_else(|| NO_CHANGE.to_string(), format_signed_hms);
        let marker = match self.state {
            FlagState::Raised => "\u{25B2}",
            FlagState::Lowered => "\u{25BD}",
        };
        write!(f, "{marker} {:<28} {:<8} {countdown}", self.flag.to_string(), self.state.to_string())
    }
}

/// Start console display: flag indicators, upcoming actions and race
/// countdowns, recomputed from the race list on every tick.
#[derive(Debug, Default)]
pub struct SignalPanel {
    races: Vec<Race>,
    sequence: StartSequence,
    last_tick: Option<DateTime<Utc>>,
    announced: Vec<String>,
}

impl SignalPanel {
    pub fn new() -> Self { Self::default() }

    /// Replaces the race list and recomputes the signals.
    pub fn set_races(&mut self, races: Vec<Race>) {
        self.sequence = StartSequence::new(&races);
        self.races = races;
    }

    pub fn races(&self) -> &[Race] { &self.races }
    pub fn sequence(&self) -> &StartSequence { &self.sequence }

    pub fn indicators(&self, now: DateTime<Utc>) -> Vec<FlagIndicator> {
        self.sequence.flags().iter().map(|flag| FlagIndicator::new(&self.sequence, flag, now)).collect()
    }

    pub fn upcoming_actions(&self, now: DateTime<Utc>) -> Vec<String> {
        self.sequence
            .upcoming(now)
            .take(ACTION_ROWS)
            .map(|s| format!("{} in {}", Self::describe(s), format_signed_hms(s.time() - now)))
            .collect()
    }

    pub fn race_rows(&self, now: DateTime<Utc>) -> Vec<String> {
        self.races
            .iter()
            .map(|race| {
                let class = race.dinghy_class().map_or("Handicap", |c| c.name());
                let (start, countdown) = match (race.planned_start(), race_countdown(race, now)) {
                    (Some(start), Some(delta)) => (
                        start.with_timezone(&Local).format("%H:%M:%S").to_string(),
                        format_signed_hms(delta),
                    ),
                    _ => ("--:--:--".to_string(), NO_CHANGE.to_string()),
                };
                format!("{:<20} {:<12} {start} {countdown:>10}", race.name(), class)
            })
            .collect()
    }

    pub fn render(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![format!("Start console  {}", now.with_timezone(&Local).format("%H:%M:%S"))];
        if self.sequence.is_empty() {
            lines.push("No races with a planned start in this session".to_string());
            return lines;
        }
        lines.push(String::new());
        lines.extend(self.indicators(now).iter().map(ToString::to_string));
        lines.push(String::new());
        lines.extend(self.upcoming_actions(now));
        lines.push(String::new());
        lines.extend(self.race_rows(now));
        if !self.announced.is_empty() {
            lines.push(String::new());
            lines.extend(self.announced.iter().map(|a| format!("Done: {a}")));
        }
        lines
    }

    /// Signals that became due since the previous tick. Nothing is reported
    /// on the first tick after a (re)start.
    pub fn due_since_last_tick(&self, now: DateTime<Utc>) -> Vec<&Signal> {
        match self.last_tick {
            Some(prev) if prev < now => self.sequence.due_between(prev, now).collect(),
            _ => Vec::new(),
        }
    }

    /// Tick handler: announces due signals and redraws the panel.
    pub fn on_tick(&mut self, tick: &Tick) {
        let due: Vec<String> = self.due_since_last_tick(tick.now()).into_iter().map(Self::describe).collect();
        for signal in due {
            sig!("{signal}");
            self.announced.push(signal);
        }
        let overflow = self.announced.len().saturating_sub(ANNOUNCED_ROWS);
        self.announced.drain(..overflow);
        self.last_tick = Some(tick.now());
        print!("\x1b[2J\x1b[H");
        for line in self.render(tick.now()) {
            println!("{line}");
        }
    }

    fn describe(signal: &Signal) -> String {
        format!(
            "{} {}: {}",
            signal.time().with_timezone(&Local).format("%H:%M:%S"),
            signal.meaning(),
            signal.visual()
        )
    }
}
