use super::flag::{Flag, FlagAction};
use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use strum_macros::{Display, EnumIter};

/// Stages of the start sequence, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum StartStage {
    #[strum(to_string = "Warning signal")]
    WarningSignal,
    #[strum(to_string = "Preparatory signal")]
    PreparatorySignal,
    #[strum(to_string = "One minute signal")]
    OneMinute,
    #[strum(to_string = "Starting signal")]
    StartingSignal,
}

impl StartStage {
    /// Time of this stage relative to the planned start.
    pub fn offset(self) -> TimeDelta {
        match self {
            StartStage::WarningSignal => TimeDelta::minutes(-5),
            StartStage::PreparatorySignal => TimeDelta::minutes(-4),
            StartStage::OneMinute => TimeDelta::minutes(-1),
            StartStage::StartingSignal => TimeDelta::zero(),
        }
    }

    pub fn time_for(self, planned_start: DateTime<Utc>) -> DateTime<Utc> { planned_start + self.offset() }
}

/// What the officer on the committee boat does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualSignal {
    flags: Vec<Flag>,
    action: FlagAction,
}

impl VisualSignal {
    pub fn new(flags: Vec<Flag>, action: FlagAction) -> Self { Self { flags, action } }
    pub fn flags(&self) -> &[Flag] { &self.flags }
    pub fn action(&self) -> FlagAction { self.action }
    pub fn affects(&self, flag: &Flag) -> bool { self.flags.contains(flag) }
}

impl Display for VisualSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action, self.flags.iter().join(" + "))
    }
}

/// A derived flag signal. Signals are recomputed whenever the race list
/// changes and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    time: DateTime<Utc>,
    stage: StartStage,
    meaning: String,
    visual: VisualSignal,
}

impl Signal {
    pub(super) fn new(time: DateTime<Utc>, stage: StartStage, race_names: &[&str], visual: VisualSignal) -> Self {
        Self {
            time,
            stage,
            meaning: format!("{stage} for {}", race_names.iter().join(", ")),
            visual,
        }
    }

    pub(super) fn append_meaning(&mut self, other: &Signal) {
        self.meaning = format!("{}; {}", self.meaning, other.meaning);
    }

    pub fn time(&self) -> DateTime<Utc> { self.time }
    pub fn stage(&self) -> StartStage { self.stage }
    pub fn meaning(&self) -> &str { &self.meaning }
    pub fn visual(&self) -> &VisualSignal { &self.visual }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.time.format("%H:%M:%S"), self.meaning, self.visual)
    }
}
