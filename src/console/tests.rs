use super::command::{Command, CommandError};
use super::options::{HANDICAP_LABEL, dinghy_class_options, race_options, select};
use super::race_backend::RaceBackend;
use super::race_console::RaceConsole;
use super::results::{corrected_time, positions, write_csv};
use super::signal_panel::SignalPanel;
use super::start_console::StartConsole;
use crate::http_handler::{
    Competitor, Dinghy, DinghyClass, Entry, HTTPError, Lap, Links, OpResult, Race, Resource, Scheduled,
    http_request::request_common::RequestError, http_response::response_common::ResponseError,
};
use crate::start_sequence::{Flag, FlagState, SessionWindow};
use crate::timing::{Clock, TimeSource, manual_time::ManualTime};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveTime, TimeDelta, Utc};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;

const BASE: &str = "http://localhost:8081/dinghyracing/api";

fn utc(s: &str) -> DateTime<Utc> { s.parse().unwrap() }

fn class(name: &str, pn: u16) -> DinghyClass {
    DinghyClass::new(name, 2, Some(pn), Links::with_self(format!("{BASE}/dinghyClasses/{name}")))
}

fn race(id: u32, name: &str, class_name: Option<&str>, start: &str) -> Race {
    Race::new(
        name,
        Some(utc(start)),
        class_name.map(|c| class(c, 1044)),
        Some(3),
        TimeDelta::minutes(45),
        Links::with_self(format!("{BASE}/races/{id}")),
    )
}

fn entry(id: u32, helm: &str, sail_number: &str, class: Option<DinghyClass>, lap_minutes: &[i64]) -> Entry {
    let laps = lap_minutes
        .iter()
        .enumerate()
        .map(|(i, m)| Lap::new(u32::try_from(i).unwrap() + 1, TimeDelta::minutes(*m)))
        .collect();
    Entry::new(
        Competitor::new(helm, Links::default()),
        Dinghy::new(sail_number, class, Links::default()),
        laps,
        Links::with_self(format!("{BASE}/entries/{id}")),
    )
}

fn names(races: &[Race]) -> Vec<&str> { races.iter().map(Race::name).collect() }

#[derive(Default)]
struct MockBackend {
    races: RefCell<Vec<Race>>,
    entries: RefCell<Vec<Entry>>,
    server_time: Cell<Option<DateTime<Utc>>>,
    unreachable: Cell<bool>,
    race_fetches: Cell<usize>,
}

impl MockBackend {
    fn with_races(races: Vec<Race>) -> Self {
        Self { races: RefCell::new(races), ..Self::default() }
    }

    fn check_reachable(&self) -> OpResult<()> {
        if self.unreachable.get() { Err(ResponseError::NoConnection.into()) } else { Ok(()) }
    }
}

#[async_trait(?Send)]
impl RaceBackend for MockBackend {
    async fn races_between(&self, window: &SessionWindow) -> OpResult<Vec<Race>> {
        self.check_reachable()?;
        self.race_fetches.set(self.race_fetches.get() + 1);
        Ok(self
            .races
            .borrow()
            .iter()
            .filter(|r| r.planned_start().is_some_and(|s| window.contains(s)))
            .cloned()
            .collect())
    }

    async fn race(&self, url: &str) -> OpResult<Race> {
        self.check_reachable()?;
        self.races
            .borrow()
            .iter()
            .find(|r| r.url() == Some(url))
            .cloned()
            .ok_or_else(|| ResponseError::NotFound { url: url.to_string() }.into())
    }

    async fn reschedule_race(&self, race: &Race, new_start: DateTime<Utc>) -> OpResult<Race> {
        self.check_reachable()?;
        let updated = Race::new(
            race.name(),
            Some(new_start),
            race.dinghy_class().cloned(),
            race.planned_laps(),
            race.duration(),
            race.links().clone(),
        );
        for r in self.races.borrow_mut().iter_mut().filter(|r| r.url() == race.url()) {
            *r = updated.clone();
        }
        Ok(updated)
    }

    async fn entries(&self, _race: &Race) -> OpResult<Vec<Entry>> {
        self.check_reachable()?;
        Ok(self.entries.borrow().clone())
    }

    async fn add_lap(&self, entry: &Entry, lap: Lap) -> OpResult<()> {
        self.check_reachable()?;
        for e in self.entries.borrow_mut().iter_mut().filter(|e| e.url() == entry.url()) {
            let mut laps = e.laps().to_vec();
            laps.push(lap);
            *e = Entry::new(e.helm().clone(), e.dinghy().clone(), laps, e.links().clone());
        }
        Ok(())
    }

    async fn server_time(&self) -> OpResult<DateTime<Utc>> {
        self.server_time.get().ok_or_else(|| ResponseError::NoConnection.into())
    }

    fn races_url(&self) -> String { format!("{BASE}/races") }
    fn entries_url(&self) -> String { format!("{BASE}/entries") }
}

fn session_races() -> Vec<Race> {
    vec![
        race(1, "Scorpion A", Some("Scorpion"), "2021-10-14T14:10:00Z"),
        race(2, "Graduate A", Some("Graduate"), "2021-10-14T16:10:00Z"),
    ]
}

fn afternoon() -> SessionWindow { SessionWindow::new(utc("2021-10-14T14:00:00Z"), utc("2021-10-14T15:00:00Z")) }
fn evening() -> SessionWindow { SessionWindow::new(utc("2021-10-14T16:00:00Z"), utc("2021-10-14T17:00:00Z")) }

fn start_console(backend: &Rc<MockBackend>, time: &ManualTime) -> StartConsole<MockBackend> {
    StartConsole::new(Rc::clone(backend), Clock::new(Box::new(time.clone())), afternoon())
}

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);

    let in_flight = console.fetch();
    console.set_window(evening());
    let (ticket, result) = in_flight.await;
    assert!(result.is_ok());
    assert!(!console.is_current(ticket));
    assert!(!console.apply(ticket, result));
    assert!(console.races().is_empty());

    assert!(console.refresh().await);
    assert_eq!(names(&console.races()), vec!["Graduate A"]);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_races() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);
    assert!(console.refresh().await);

    backend.unreachable.set(true);
    assert!(!console.refresh().await);
    assert_eq!(names(&console.races()), vec!["Scorpion A"]);
}

#[tokio::test]
async fn test_race_update_requests_refresh() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);
    assert!(console.refresh_requested());
    console.refresh().await;
    assert!(!console.refresh_requested());

    assert_eq!(console.notify_update(&format!("{BASE}/competitors/3")), 0);
    assert!(!console.refresh_requested());
    assert_eq!(console.notify_update(&format!("{BASE}/races/7")), 1);
    assert!(console.refresh_requested());
}

#[tokio::test]
async fn test_postpone_moves_planned_start() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);
    console.refresh().await;

    let updated = console.postpone("scorpion a", TimeDelta::minutes(5)).await.unwrap();
    assert_eq!(updated.planned_start(), Some(utc("2021-10-14T14:15:00Z")));
    assert!(console.refresh_requested());
    console.refresh().await;
    assert_eq!(console.races()[0].planned_start(), Some(utc("2021-10-14T14:15:00Z")));

    let unknown = console.postpone("Comet A", TimeDelta::minutes(5)).await;
    assert!(matches!(unknown, Err(HTTPError::HTTPRequestError(RequestError::Unknown { .. }))));
}

#[tokio::test]
async fn test_window_command_and_quit() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(Utc::now());
    let mut console = start_console(&backend, &time);
    let before = console.ticket();

    assert!(!console.handle_line("window 09:00 10:30").await);
    assert!(!console.is_current(before));
    assert_eq!(
        console.window().start().with_timezone(&Local).time(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    );
    assert!(!console.handle_line("unknown words").await);
    assert!(console.handle_line("quit").await);
}

#[tokio::test]
async fn test_teardown_detaches_console() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);
    assert_eq!(console.clock().tick_handler_count(), 1);

    let ticket = console.ticket();
    console.teardown();
    assert_eq!(console.clock().tick_handler_count(), 0);
    assert_eq!(console.notify_update(&format!("{BASE}/races/1")), 0);
    assert!(!console.apply(ticket, Ok(session_races())));
}

#[tokio::test(start_paused = true)]
async fn test_run_until_quit() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    backend.server_time.set(Some(utc("2021-10-14T13:00:05Z")));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);

    let input = (&b"help\nquit\n"[..]).lines();
    console.run(input, None, CancellationToken::new()).await;
    assert_eq!(console.clock().offset(), TimeDelta::seconds(5));
    assert_eq!(console.clock().tick_handler_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_cancellation() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T13:00:00Z"));
    let mut console = start_console(&backend, &time);

    let cancel = CancellationToken::new();
    cancel.cancel();
    console.run((&b""[..]).lines(), None, cancel).await;
    assert_eq!(console.clock().tick_handler_count(), 0);
}

#[test]
fn test_signal_panel_indicators() {
    let mut panel = SignalPanel::new();
    panel.set_races(vec![race(1, "Scorpion A", Some("Scorpion"), "2021-10-14T14:10:00Z")]);
    let now = utc("2021-10-14T14:06:40Z");

    let indicators = panel.indicators(now);
    assert_eq!(indicators.len(), 2);
    assert_eq!(indicators[0].flag(), &Flag::Class("Scorpion".to_string()));
    assert_eq!(indicators[0].state(), FlagState::Raised);
    assert_eq!(indicators[0].next_change(), Some(TimeDelta::seconds(200)));
    assert!(indicators[0].to_string().contains("00:03:20"));
    assert_eq!(indicators[1].flag(), &Flag::BluePeter);
    assert_eq!(indicators[1].next_change(), Some(TimeDelta::seconds(140)));

    let lines = panel.render(now);
    assert!(lines.iter().any(|l| l.contains("Scorpion Class Flag")));
    assert!(lines.iter().any(|l| l.contains("Scorpion A") && l.contains("-00:03:20")));

    let after_start = panel.indicators(utc("2021-10-14T14:30:00Z"));
    assert!(after_start.iter().all(|i| i.state() == FlagState::Lowered && i.next_change().is_none()));
}

#[test]
fn test_signal_panel_reports_due_signals_after_first_tick() {
    let time = ManualTime::new(utc("2021-10-14T14:04:30Z"));
    let mut clock = Clock::new(Box::new(time.clone()));
    let mut panel = SignalPanel::new();
    panel.set_races(vec![race(1, "Scorpion A", Some("Scorpion"), "2021-10-14T14:10:00Z")]);

    assert!(panel.due_since_last_tick(time.now()).is_empty());
    panel.on_tick(&clock.tick());
    time.advance(TimeDelta::seconds(31));
    let due = panel.due_since_last_tick(time.now());
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].meaning(), "Warning signal for Scorpion A");

    panel.on_tick(&clock.tick());
    assert!(panel.due_since_last_tick(time.now()).is_empty());
    let lines = panel.render(time.now());
    assert!(lines.iter().any(|l| l.starts_with("Done:") && l.contains("Warning signal for Scorpion A")));
}

#[tokio::test]
async fn test_race_console_records_laps_from_planned_start() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T14:12:00Z"));
    backend.server_time.set(Some(utc("2021-10-14T14:12:00Z")));
    backend.entries.borrow_mut().push(entry(1, "Jill Myer", "1234", Some(class("Scorpion", 1044)), &[]));

    let mut console = RaceConsole::open(Rc::clone(&backend), &format!("{BASE}/races/1"), Clock::new(Box::new(time.clone())))
        .await
        .unwrap();
    assert_eq!(console.elapsed(), TimeDelta::minutes(2));

    let first = console.record_lap("1234").await.unwrap();
    assert_eq!((first.number(), first.time()), (1, TimeDelta::minutes(2)));
    time.advance(TimeDelta::minutes(3));
    let second = console.record_lap("1234").await.unwrap();
    assert_eq!((second.number(), second.time()), (2, TimeDelta::minutes(3)));
    assert_eq!(console.entry("1234").unwrap().sum_of_lap_times(), TimeDelta::minutes(5));

    let unknown = console.record_lap("9999").await;
    assert!(matches!(unknown, Err(HTTPError::HTTPRequestError(RequestError::Unknown { .. }))));
}

#[tokio::test]
async fn test_race_console_rejects_laps_before_start() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T14:00:00Z"));
    backend.entries.borrow_mut().push(entry(1, "Jill Myer", "1234", None, &[]));

    let mut console = RaceConsole::open(Rc::clone(&backend), &format!("{BASE}/races/1"), Clock::new(Box::new(time.clone())))
        .await
        .unwrap();
    assert_eq!(console.elapsed(), TimeDelta::minutes(-10));
    let early = console.record_lap("1234").await;
    assert!(matches!(early, Err(HTTPError::HTTPRequestError(RequestError::NotStarted { .. }))));
}

#[tokio::test]
async fn test_race_console_follows_rescheduled_start() {
    let backend = Rc::new(MockBackend::with_races(session_races()));
    let time = ManualTime::new(utc("2021-10-14T14:12:00Z"));
    let mut console = RaceConsole::open(Rc::clone(&backend), &format!("{BASE}/races/1"), Clock::new(Box::new(time.clone())))
        .await
        .unwrap();

    let race = console.race().clone();
    backend.reschedule_race(&race, utc("2021-10-14T14:11:00Z")).await.unwrap();
    assert_eq!(console.notify_update(&format!("{BASE}/races/1")), 1);
    assert!(console.refresh_requested());
    console.refresh().await.unwrap();
    assert_eq!(console.elapsed(), TimeDelta::minutes(1));
    assert_eq!(console.notify_update(&format!("{BASE}/entries/4")), 1);
}

#[test]
fn test_positions_rank_laps_then_time() {
    let scorpion = Some(class("Scorpion", 1044));
    let race = race(1, "Scorpion A", Some("Scorpion"), "2021-10-14T14:10:00Z");
    let entries = vec![
        entry(1, "Jill Myer", "1234", scorpion.clone(), &[10, 11]),
        entry(2, "Chris Marshall", "2345", scorpion.clone(), &[10, 10]),
        entry(3, "Sarah Pascal", "6745", scorpion.clone(), &[30]),
        entry(4, "Jill Simmonds", "7811", scorpion, &[]),
    ];
    let rows = positions(&race, &entries);
    let order: Vec<(usize, &str)> = rows.iter().map(|r| (r.position(), r.sail_number())).collect();
    assert_eq!(order, vec![(1, "2345"), (2, "1234"), (3, "6745"), (4, "7811")]);
    assert!(rows.iter().all(|r| r.corrected().is_none()));
}

#[test]
fn test_positions_handicap_uses_corrected_time() {
    let race = race(1, "Handicap A", None, "2021-10-14T14:10:00Z");
    let entries = vec![
        entry(1, "Jill Myer", "1234", Some(class("Scorpion", 1000)), &[30, 30]),
        entry(2, "Chris Marshall", "2345", Some(class("Comet", 1200)), &[33, 33]),
    ];
    let rows = positions(&race, &entries);
    assert_eq!(rows[0].sail_number(), "2345");
    assert_eq!(rows[0].corrected(), Some(TimeDelta::minutes(55)));
    assert_eq!(rows[1].corrected(), Some(TimeDelta::minutes(60)));
    assert_eq!(corrected_time(TimeDelta::minutes(10), 0), None);
}

#[test]
fn test_write_csv() {
    let race = race(1, "Scorpion A", Some("Scorpion"), "2021-10-14T14:10:00Z");
    let rows = positions(&race, &[entry(1, "Chris Marshall", "2345", Some(class("Scorpion", 1044)), &[10, 10])]);
    let mut out = Vec::new();
    write_csv(&rows, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Position,SailNumber,Helm,Class,Laps,Elapsed,Corrected\n1,2345,Chris Marshall,Scorpion,2,00:20:00,\n"
    );
}

#[test]
fn test_dinghy_class_options() {
    let classes = vec![class("Comet", 1210), class("Comet Trio", 1104), class("Graduate", 1129)];
    let options = dinghy_class_options(&classes);
    assert_eq!(options.len(), 4);
    assert_eq!(options[0].label(), HANDICAP_LABEL);
    assert_eq!(options[0].value(), None);
    assert_eq!(options[3].value(), Some(format!("{BASE}/dinghyClasses/Graduate").as_str()));

    assert_eq!(select(&options, "comet").map(|o| o.label()), Some("Comet"));
    assert_eq!(select(&options, "grad").map(|o| o.label()), Some("Graduate"));
    assert!(select(&options, "com").is_none());
    assert!(select(&options, "Laser").is_none());
    assert!(dinghy_class_options(&[]).len() == 1);
}

#[test]
fn test_race_options_point_at_race_links() {
    let options = race_options(&session_races());
    assert_eq!(options.len(), 2);
    assert!(options[0].label().starts_with("Scorpion A ("));
    assert_eq!(options[1].value(), Some(format!("{BASE}/races/2").as_str()));
}

#[test]
fn test_parse_commands() {
    assert_eq!(
        "window 09:00 10:30".parse::<Command>(),
        Ok(Command::Window {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            close: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        })
    );
    assert_eq!(
        "postpone Scorpion A 5".parse::<Command>(),
        Ok(Command::Postpone { race: "Scorpion A".to_string(), by: TimeDelta::minutes(5) })
    );
    assert_eq!("LAP 1234".parse::<Command>(), Ok(Command::Lap { sail_number: "1234".to_string() }));
    assert_eq!("  quit ".parse::<Command>(), Ok(Command::Quit));

    assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
    assert!(matches!("postpone 5".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
    assert!(matches!("postpone Scorpion A soon".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
    assert!(matches!("window 25:00 10:00".parse::<Command>(), Err(CommandError::InvalidArgument { .. })));
    assert!(matches!("lap".parse::<Command>(), Err(CommandError::MissingArgument { .. })));
    assert_eq!(
        "dance".parse::<Command>().unwrap_err().to_string(),
        "Unknown command \"dance\", try \"help\""
    );
}
