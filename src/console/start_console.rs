use super::command::Command;
use super::race_backend::RaceBackend;
use super::signal_panel::SignalPanel;
use crate::http_handler::{OpResult, Race, Scheduled, http_request::request_common::RequestError};
use crate::start_sequence::SessionWindow;
use crate::timing::{Clock, TickHandlerId};
use crate::updates::{SubscriptionId, UpdateHub, UpdateStream};
use crate::{error, event, info, log, warn};
use chrono::{Local, TimeDelta};
use futures::FutureExt;
use futures::future::{LocalBoxFuture, OptionFuture};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use tokio::io::{AsyncBufRead, Lines};
use tokio_util::sync::CancellationToken;

/// Session generation a race list fetch was issued in. Results carrying an
/// outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

type RaceFetch = LocalBoxFuture<'static, (FetchTicket, OpResult<Vec<Race>>)>;

enum LoopEvent {
    Shutdown,
    Tick,
    Fetched(FetchTicket, OpResult<Vec<Race>>),
    Update(Option<String>),
    Input(std::io::Result<Option<String>>),
}

/// Runs the starts of a session: keeps the races of the session window,
/// their start sequence and the signal panel up to date.
pub struct StartConsole<B: RaceBackend> {
    backend: Rc<B>,
    clock: Clock,
    window: SessionWindow,
    panel: Rc<RefCell<SignalPanel>>,
    hub: UpdateHub,
    /// Bumped whenever previously issued fetches become meaningless.
    generation: u64,
    refresh_requested: Rc<Cell<bool>>,
    tick_handler: Option<TickHandlerId>,
    subscription: Option<SubscriptionId>,
}

impl<B: RaceBackend + 'static> StartConsole<B> {
    pub fn new(backend: Rc<B>, mut clock: Clock, window: SessionWindow) -> Self {
        let panel = Rc::new(RefCell::new(SignalPanel::new()));
        let tick_panel = Rc::clone(&panel);
        let tick_handler = clock.register_tick_handler(move |tick| tick_panel.borrow_mut().on_tick(tick));

        let refresh_requested = Rc::new(Cell::new(true));
        let mut hub = UpdateHub::new();
        let on_update = Rc::clone(&refresh_requested);
        let subscription = hub.register(&backend.races_url(), move |_| on_update.set(true));

        Self {
            backend,
            clock,
            window,
            panel,
            hub,
            generation: 0,
            refresh_requested,
            tick_handler: Some(tick_handler),
            subscription: Some(subscription),
        }
    }

    pub fn window(&self) -> SessionWindow { self.window }
    pub fn clock(&self) -> &Clock { &self.clock }
    pub fn panel(&self) -> Ref<'_, SignalPanel> { self.panel.borrow() }
    pub fn races(&self) -> Vec<Race> { self.panel.borrow().races().to_vec() }

    /// Selects another session window. Fetches still in flight for the old
    /// window are discarded on arrival.
    pub fn set_window(&mut self, window: SessionWindow) {
        if window == self.window {
            return;
        }
        self.window = window;
        self.generation += 1;
        self.refresh_requested.set(true);
        log!("Session window now {}", Self::describe_window(window));
    }

    pub fn ticket(&self) -> FetchTicket { FetchTicket(self.generation) }
    pub fn is_current(&self, ticket: FetchTicket) -> bool { ticket.0 == self.generation }
    pub fn refresh_requested(&self) -> bool { self.refresh_requested.get() }
    pub fn request_refresh(&self) { self.refresh_requested.set(true) }

    /// Race list fetch for the current window. The future owns everything it
    /// needs so it can be polled alongside the console's other events.
    pub fn fetch(&self) -> RaceFetch {
        let backend = Rc::clone(&self.backend);
        let window = self.window;
        let ticket = self.ticket();
        event!("Fetching races for {}", Self::describe_window(window));
        async move { (ticket, backend.races_between(&window).await) }.boxed_local()
    }

    /// Applies a fetched race list. Returns `false` if the result was
    /// discarded as stale or failed; the previous races stay in place.
    pub fn apply(&mut self, ticket: FetchTicket, result: OpResult<Vec<Race>>) -> bool {
        if !self.is_current(ticket) {
            event!("Discarding race list fetched for a previous session window");
            return false;
        }
        match result {
            Ok(races) => {
                info!("Loaded {} race(s) for {}", races.len(), Self::describe_window(self.window));
                self.panel.borrow_mut().set_races(races);
                true
            }
            Err(e) => {
                error!("Could not load races: {e}");
                false
            }
        }
    }

    /// Fetches and applies the race list in one go.
    pub async fn refresh(&mut self) -> bool {
        self.refresh_requested.set(false);
        let (ticket, result) = self.fetch().await;
        self.apply(ticket, result)
    }

    /// Forwards an update notification to the observers. Returns the number
    /// of observers notified.
    pub fn notify_update(&mut self, url: &str) -> usize { self.hub.notify(url) }

    pub async fn sync_clock(&mut self) {
        match self.backend.server_time().await {
            Ok(server_time) => {
                self.clock.sync_to(server_time);
                log!("Clock synchronised, offset {} ms", self.clock.offset().num_milliseconds());
            }
            Err(e) => warn!("Could not read server time, using local clock: {e}"),
        }
    }

    /// Moves the planned start of the race called `race_name` by `by`.
    pub async fn postpone(&mut self, race_name: &str, by: TimeDelta) -> OpResult<Race> {
        let race = self
            .races()
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(race_name))
            .ok_or_else(|| RequestError::unknown("race", race_name))?;
        let start = race.planned_start().unwrap_or_else(|| self.clock.now());
        let updated = self.backend.reschedule_race(&race, start + by).await?;
        self.refresh_requested.set(true);
        Ok(updated)
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
            Command::Window { open, close } => {
                let today = self.clock.now().with_timezone(&Local).date_naive();
                match SessionWindow::on_date(today, open, close, &Local) {
                    Some(window) => self.set_window(window),
                    None => warn!("{open} to {close} does not exist today"),
                }
            }
            Command::Postpone { race, by } => match self.postpone(&race, by).await {
                Ok(updated) => info!("{} rescheduled", updated.name()),
                Err(e) => error!("Could not postpone {race}: {e}"),
            },
            Command::Refresh => self.request_refresh(),
            Command::Lap { .. } | Command::Results | Command::Export { .. } => {
                warn!("Laps and results are recorded in the race console");
            }
            Command::Help => info!("{}", Command::HELP),
            Command::Quit => return true,
        }
        false
    }

    /// Event loop of the console. Ends on `quit`, on cancellation, or
    /// never if neither happens.
    pub async fn run<R>(
        &mut self,
        mut input: Lines<R>,
        mut updates: Option<UpdateStream>,
        cancel: CancellationToken,
    ) where
        R: AsyncBufRead + Unpin,
    {
        self.sync_clock().await;
        let mut pending: Option<RaceFetch> = None;
        let mut input_open = true;
        loop {
            if pending.is_none() && self.refresh_requested.replace(false) {
                pending = Some(self.fetch());
            }
            let delay = self.clock.delay_to_next_tick();
            let listening = updates.as_ref().is_some_and(|u| !u.is_finished());
            let fetching = pending.is_some();

            let event = tokio::select! {
                () = cancel.cancelled() => LoopEvent::Shutdown,
                () = tokio::time::sleep(delay) => LoopEvent::Tick,
                Some((ticket, result)) = OptionFuture::from(pending.as_mut()), if fetching => {
                    LoopEvent::Fetched(ticket, result)
                }
                update = async {
                    match updates.as_mut() {
                        Some(stream) => stream.next_update().await,
                        None => None,
                    }
                }, if listening => LoopEvent::Update(update),
                line = input.next_line(), if input_open => LoopEvent::Input(line),
            };

            match event {
                LoopEvent::Shutdown => break,
                LoopEvent::Tick => {
                    self.clock.tick();
                }
                LoopEvent::Fetched(ticket, result) => {
                    pending = None;
                    self.apply(ticket, result);
                }
                LoopEvent::Update(Some(url)) => {
                    self.notify_update(&url);
                }
                LoopEvent::Update(None) => (),
                LoopEvent::Input(Ok(Some(line))) => {
                    if !line.trim().is_empty() && self.handle_line(&line).await {
                        break;
                    }
                }
                LoopEvent::Input(Ok(None)) => {
                    input_open = false;
                    log!("Input closed, console keeps running until interrupted");
                }
                LoopEvent::Input(Err(e)) => {
                    input_open = false;
                    error!("Could not read input: {e}");
                }
            }
        }
        self.teardown();
    }

    /// Detaches the console from its clock and update notifications and
    /// invalidates outstanding fetches.
    pub fn teardown(&mut self) {
        self.generation += 1;
        if let Some(id) = self.tick_handler.take() {
            self.clock.unregister_tick_handler(id);
        }
        if let Some(id) = self.subscription.take() {
            self.hub.unregister(id);
        }
    }

    fn describe_window(window: SessionWindow) -> String {
        format!(
            "{} to {}",
            window.start().with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            window.end().with_timezone(&Local).format("%H:%M")
        )
    }
}
