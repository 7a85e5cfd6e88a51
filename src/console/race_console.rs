use super::command::Command;
use super::race_backend::{RaceBackend, link_of};
use super::results::{self, ResultRow};
use crate::http_handler::{
    Entry, HTTPError, Lap, OpResult, Race, Scheduled, http_request::request_common::RequestError,
};
use crate::start_sequence::format_signed_hms;
use crate::timing::Clock;
use crate::updates::{SubscriptionId, UpdateHub, UpdateStream};
use crate::{error, info, log, warn};
use chrono::TimeDelta;
use std::cell::Cell;
use std::rc::Rc;
use tokio::io::{AsyncBufRead, Lines};
use tokio_util::sync::CancellationToken;

/// Times a single race: the clock counts from the planned start, laps are
/// recorded against it and the standings are derived from the entries.
pub struct RaceConsole<B: RaceBackend> {
    backend: Rc<B>,
    race: Race,
    clock: Clock,
    entries: Vec<Entry>,
    hub: UpdateHub,
    refresh_requested: Rc<Cell<bool>>,
    subscriptions: Vec<SubscriptionId>,
}

impl<B: RaceBackend> RaceConsole<B> {
    /// Loads the race behind `race_url` and starts `clock` at its planned
    /// start, synchronised to the backend's time.
    pub async fn open(backend: Rc<B>, race_url: &str, mut clock: Clock) -> OpResult<Self> {
        let race = backend.race(race_url).await?;
        match backend.server_time().await {
            Ok(server_time) => clock.sync_to(server_time),
            Err(e) => warn!("Could not read server time, using local clock: {e}"),
        }
        match race.planned_start() {
            Some(start) => clock.start_at(start),
            None => {
                warn!("{} has no planned start, timing from now", race.name());
                clock.start();
            }
        }
        let entries = backend.entries(&race).await?;

        let refresh_requested = Rc::new(Cell::new(false));
        let mut hub = UpdateHub::new();
        let subscriptions = [race_url.to_string(), backend.entries_url()]
            .iter()
            .map(|url| {
                let on_update = Rc::clone(&refresh_requested);
                hub.register(url, move |_| on_update.set(true))
            })
            .collect();

        Ok(Self { backend, race, clock, entries, hub, refresh_requested, subscriptions })
    }

    pub fn race(&self) -> &Race { &self.race }
    pub fn entries(&self) -> &[Entry] { &self.entries }
    pub fn clock(&self) -> &Clock { &self.clock }
    pub fn elapsed(&self) -> TimeDelta { self.clock.elapsed() }
    pub fn refresh_requested(&self) -> bool { self.refresh_requested.get() }

    pub fn entry(&self, sail_number: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.dinghy().sail_number().eq_ignore_ascii_case(sail_number))
    }

    /// Reloads race and entries. A changed planned start restarts the clock.
    pub async fn refresh(&mut self) -> OpResult<()> {
        self.refresh_requested.set(false);
        let url = link_of(&self.race, self.race.name())?;
        let race = self.backend.race(&url).await?;
        if race.planned_start() != self.race.planned_start() {
            if let Some(start) = race.planned_start() {
                log!("{} now starts at {start}, clock restarted", race.name());
                self.clock.start_at(start);
            }
        }
        self.race = race;
        self.entries = self.backend.entries(&self.race).await?;
        Ok(())
    }

    /// Records a lap for the dinghy with `sail_number` at the current
    /// elapsed time. The lap time counts from the previous lap.
    pub async fn record_lap(&mut self, sail_number: &str) -> OpResult<Lap> {
        let elapsed = self.clock.elapsed();
        if elapsed <= TimeDelta::zero() {
            return Err(RequestError::NotStarted { race: self.race.name().to_string() }.into());
        }
        let entry = self
            .entry(sail_number)
            .ok_or_else(|| HTTPError::from(RequestError::unknown("sail number", sail_number)))?;
        let number = u32::try_from(entry.laps().len() + 1).unwrap_or(u32::MAX);
        let lap = Lap::new(number, elapsed - entry.sum_of_lap_times());
        self.backend.add_lap(entry, lap).await?;
        self.entries = self.backend.entries(&self.race).await?;
        Ok(lap)
    }

    pub fn results(&self) -> Vec<ResultRow> { results::positions(&self.race, &self.entries) }

    pub fn notify_update(&mut self, url: &str) -> usize { self.hub.notify(url) }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![format!("{}  {}", self.race.name(), format_signed_hms(self.elapsed()))];
        if let Some(laps) = self.race.planned_laps() {
            lines.push(format!("Planned laps: {laps}"));
        }
        lines.push(String::new());
        for row in self.results() {
            let corrected = row.corrected().map(format_signed_hms).unwrap_or_default();
            lines.push(format!(
                "{:>3} {:<8} {:<20} {:>3} {:>9} {corrected:>9}",
                row.position(),
                row.sail_number(),
                row.helm(),
                row.laps(),
                format_signed_hms(row.elapsed()),
            ));
        }
        lines
    }

    /// Executes one line of operator input. Returns `true` on quit.
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}");
                return false;
            }
        };
        match command {
            Command::Lap { sail_number } => match self.record_lap(&sail_number).await {
                Ok(lap) => info!("{sail_number} lap {} in {}", lap.number(), format_signed_hms(lap.time())),
                Err(e) => error!("Could not record lap for {sail_number}: {e}"),
            },
            Command::Refresh => {
                if let Err(e) = self.refresh().await {
                    error!("Could not refresh {}: {e}", self.race.name());
                }
            }
            Command::Results => {
                for line in self.render() {
                    info!("{line}");
                }
            }
            Command::Export { path } => match results::export_csv(&self.results(), &path) {
                Ok(()) => info!("Results written to {}", path.display()),
                Err(e) => error!("Could not write {}: {e}", path.display()),
            },
            Command::Window { .. } | Command::Postpone { .. } => {
                warn!("Session window and start times are managed in the start console");
            }
            Command::Help => info!("{}", Command::HELP),
            Command::Quit => return true,
        }
        false
    }

    /// Event loop of the console. Ends on `quit` or on cancellation.
    pub async fn run<R>(
        &mut self,
        mut input: Lines<R>,
        mut updates: Option<UpdateStream>,
        cancel: CancellationToken,
    ) where
        R: AsyncBufRead + Unpin,
    {
        let mut input_open = true;
        loop {
            if self.refresh_requested.get() {
                if let Err(e) = self.refresh().await {
                    error!("Could not refresh {}: {e}", self.race.name());
                }
            }
            let delay = self.clock.delay_to_next_tick();
            let listening = updates.as_ref().is_some_and(|u| !u.is_finished());
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {
                    self.clock.tick();
                    print!("\x1b[2J\x1b[H");
                    for line in self.render() {
                        println!("{line}");
                    }
                }
                update = async {
                    match updates.as_mut() {
                        Some(stream) => stream.next_update().await,
                        None => None,
                    }
                }, if listening => {
                    if let Some(url) = update {
                        self.notify_update(&url);
                    }
                }
                line = input.next_line(), if input_open => match line {
                    Ok(Some(line)) => {
                        if !line.trim().is_empty() && self.handle_line(&line).await {
                            break;
                        }
                    }
                    Ok(None) => input_open = false,
                    Err(e) => {
                        input_open = false;
                        error!("Could not read input: {e}");
                    }
                },
            }
        }
        self.teardown();
    }

    pub fn teardown(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.hub.unregister(id);
        }
        if self.clock.is_running() {
            self.clock.stop();
        }
    }
}
