use super::flag::{Flag, FlagAction, FlagState};
use super::signal::{Signal, StartStage, VisualSignal};
use crate::event;
use crate::http_handler::{Race, Scheduled};
use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use std::collections::HashMap;

/// Consecutive races whose start sequences touch or overlap. The blue peter
/// is raised once for the whole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartGroup {
    races: Vec<(String, DateTime<Utc>)>,
}

impl StartGroup {
    fn new(name: &str, start: DateTime<Utc>) -> Self { Self { races: vec![(name.to_string(), start)] } }

    /// A race joins the group when its warning signal is due no later than
    /// the group's most recent starting signal.
    fn accepts(&self, start: DateTime<Utc>) -> bool {
        StartStage::WarningSignal.time_for(start) <= self.last_start()
    }

    pub fn race_names(&self) -> Vec<&str> { self.races.iter().map(|(n, _)| n.as_str()).collect() }
    pub fn len(&self) -> usize { self.races.len() }
    pub fn is_empty(&self) -> bool { self.races.is_empty() }

    pub fn first_start(&self) -> DateTime<Utc> { self.races.first().map_or(DateTime::<Utc>::MIN_UTC, |r| r.1) }
    pub fn last_start(&self) -> DateTime<Utc> { self.races.last().map_or(DateTime::<Utc>::MIN_UTC, |r| r.1) }

    /// Blue peter raise and lower time for this group.
    pub fn blue_peter_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            StartStage::PreparatorySignal.time_for(self.first_start()),
            StartStage::OneMinute.time_for(self.last_start()),
        )
    }
}

/// Flag signals for running the starts of a list of races.
///
/// Per race the class flag (handicap flag for handicap races) goes up with
/// the warning signal and down with the starting signal. Per start group the
/// blue peter goes up with the first preparatory signal and down with the
/// last one minute signal.
///
/// Signals are sorted by time. Coinciding signals keep race list order,
/// then protocol stage order. Each flag strictly alternates between raise and
/// lower; where two races would need the same flag up at once, the flag is
/// raised once and lowered after the later of the two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartSequence {
    groups: Vec<StartGroup>,
    signals: Vec<Signal>,
    flags: Vec<Flag>,
}

impl StartSequence {
    pub fn new(races: &[Race]) -> Self {
        // (position in `races`, race, start), in start order
        let scheduled: Vec<(usize, &Race, DateTime<Utc>)> = races
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.planned_start().map(|t| (i, r, t)))
            .sorted_by_key(|(i, _, t)| (*t, *i))
            .collect();
        if scheduled.len() < races.len() {
            event!(
                "Ignoring {} race(s) without planned start time",
                races.len() - scheduled.len()
            );
        }

        let mut groups: Vec<(StartGroup, usize, usize)> = Vec::new();
        for &(order, race, start) in &scheduled {
            match groups.last_mut() {
                Some((group, _, last)) if group.accepts(start) => {
                    group.races.push((race.name().to_string(), start));
                    *last = order;
                }
                _ => groups.push((StartGroup::new(race.name(), start), order, order)),
            }
        }

        let mut keyed: Vec<(usize, Signal)> = Vec::with_capacity(scheduled.len() * 2 + groups.len() * 2);
        for &(order, race, start) in &scheduled {
            let flag = Self::class_flag(race);
            for (stage, action) in [
                (StartStage::WarningSignal, FlagAction::Raise),
                (StartStage::StartingSignal, FlagAction::Lower),
            ] {
                let visual = VisualSignal::new(vec![flag.clone()], action);
                keyed.push((order, Signal::new(stage.time_for(start), stage, &[race.name()], visual)));
            }
        }
        for (group, first, last) in &groups {
            let (raise, lower) = group.blue_peter_window();
            let names = group.race_names();
            keyed.push((
                *first,
                Signal::new(
                    raise,
                    StartStage::PreparatorySignal,
                    &names,
                    VisualSignal::new(vec![Flag::BluePeter], FlagAction::Raise),
                ),
            ));
            keyed.push((
                *last,
                Signal::new(
                    lower,
                    StartStage::OneMinute,
                    &names,
                    VisualSignal::new(vec![Flag::BluePeter], FlagAction::Lower),
                ),
            ));
        }
        keyed.sort_by_key(|(order, s)| (s.time(), *order, s.stage()));

        let signals = Self::alternate(keyed.into_iter().map(|(_, s)| s));
        let flags = signals.iter().flat_map(|s| s.visual().flags()).unique().cloned().collect();
        Self {
            groups: groups.into_iter().map(|(g, _, _)| g).collect(),
            signals,
            flags,
        }
    }

    /// Flag identifying a race's start.
    pub fn class_flag(race: &Race) -> Flag {
        race.dinghy_class().map_or(Flag::Handicap, |c| Flag::Class(c.name().to_string()))
    }

    /// Keeps only the signals that change a flag's state. Identical signals
    /// at the same instant are merged into one. A raise of a flag that is
    /// already up, or a lower while another race still holds it, is dropped.
    fn alternate(sorted: impl Iterator<Item = Signal>) -> Vec<Signal> {
        let mut holders: HashMap<Flag, usize> = HashMap::new();
        let mut out: Vec<Signal> = Vec::new();
        for signal in sorted {
            let action = signal.visual().action();
            if let Some(prev) = out
                .iter_mut()
                .rev()
                .take_while(|s| s.time() == signal.time())
                .find(|s| s.visual() == signal.visual())
            {
                prev.append_meaning(&signal);
                continue;
            }
            let mut emit = false;
            for flag in signal.visual().flags() {
                let count = holders.entry(flag.clone()).or_insert(0);
                emit |= match action {
                    FlagAction::Raise => {
                        *count += 1;
                        *count == 1
                    }
                    FlagAction::Lower if *count == 0 => false,
                    FlagAction::Lower => {
                        *count -= 1;
                        *count == 0
                    }
                };
            }
            if emit {
                out.push(signal);
            } else {
                event!("{} shares a flag with an overlapping start, flag stays up", signal.meaning());
            }
        }
        out
    }

    pub fn signals(&self) -> &[Signal] { &self.signals }
    pub fn groups(&self) -> &[StartGroup] { &self.groups }
    /// Flags used by the sequence, in order of first use.
    pub fn flags(&self) -> &[Flag] { &self.flags }
    pub fn is_empty(&self) -> bool { self.signals.is_empty() }

    /// State set by the most recent signal for `flag` at or before `at`.
    pub fn flag_state(&self, flag: &Flag, at: DateTime<Utc>) -> FlagState {
        self.signals
            .iter()
            .rev()
            .find(|s| s.time() <= at && s.visual().affects(flag))
            .map_or(FlagState::Lowered, |s| s.visual().action().resulting_state())
    }

    /// The next signal after `at` that changes `flag`.
    pub fn next_change(&self, flag: &Flag, at: DateTime<Utc>) -> Option<&Signal> {
        self.signals.iter().find(|s| s.time() > at && s.visual().affects(flag))
    }

    /// Time until `flag` next changes, `None` once it has reached its final state.
    pub fn time_to_next_change(&self, flag: &Flag, at: DateTime<Utc>) -> Option<TimeDelta> {
        self.next_change(flag, at).map(|s| (s.time() - at).max(TimeDelta::zero()))
    }

    /// Signals still to come after `at`.
    pub fn upcoming(&self, at: DateTime<Utc>) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.time() > at)
    }

    /// Signals that became due in `(after, until]`.
    pub fn due_between(&self, after: DateTime<Utc>, until: DateTime<Utc>) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.time() > after && s.time() <= until)
    }
}
