#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod console;
mod http_handler;
mod keychain;
mod logger;
mod operations;
mod start_sequence;
mod timing;
mod updates;

use crate::console::{
    race_backend::{RaceBackend, link_of},
    race_console::RaceConsole,
    start_console::StartConsole,
};
use crate::http_handler::{OpResult, Resource, Scheduled, http_client::HTTPClient};
use crate::keychain::Keychain;
use crate::start_sequence::SessionWindow;
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;

const DEFAULT_BASE_URL: &str = "http://localhost:8081/dinghyracing/api";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Root URL of the race backend's REST API
    #[arg(long, env = "REGATTA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Update notification stream, defaults to /updates below the base URL
    #[arg(long, env = "REGATTA_UPDATES_URL")]
    updates_url: Option<String>,

    #[command(subcommand)]
    operation: Operation,
}

#[derive(Subcommand, Debug)]
enum Operation {
    /// List the dinghy classes
    Classes,
    /// Create a dinghy class
    CreateClass {
        name: String,
        #[arg(long, default_value_t = 1)]
        crew_size: u8,
        #[arg(long)]
        portsmouth_number: Option<u16>,
    },
    /// Create a race, a handicap race unless a class is given
    CreateRace {
        name: String,
        /// Planned start, "HH:MM" today, "YYYY-MM-DD HH:MM" local or RFC 3339
        #[arg(long, value_parser = parse_start)]
        start: DateTime<Utc>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long, default_value_t = 45)]
        duration_minutes: i64,
        #[arg(long, default_value_t = 1)]
        laps: u32,
    },
    /// Register a competitor
    CreateCompetitor { name: String },
    /// Register a dinghy of a class
    CreateDinghy {
        sail_number: String,
        #[arg(long)]
        class: String,
    },
    /// Enter a helm and dinghy into one of today's races
    Enter {
        #[arg(long)]
        race: String,
        #[arg(long)]
        helm: String,
        #[arg(long)]
        sail_number: String,
    },
    /// List the races of a session window
    Races {
        #[arg(long, value_parser = parse_time)]
        from: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        to: Option<NaiveTime>,
    },
    /// Run the starts of a session window
    StartConsole {
        #[arg(long, value_parser = parse_time)]
        from: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        to: Option<NaiveTime>,
    },
    /// Time one of today's races and record laps
    RaceConsole {
        #[arg(long)]
        race: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let keychain = Keychain::new(&args.base_url, args.updates_url.as_deref())
        .unwrap_or_else(|e| fatal!("Cannot set up HTTP client for {}: {e}", args.base_url));
    let client = keychain.client();
    info!("Using race backend at {}", client.url());

    match args.operation {
        Operation::Classes => {
            if let Some(classes) = report("List dinghy classes", operations::dinghy_classes(&client).await) {
                for class in classes {
                    let pn = class.portsmouth_number().map_or_else(String::new, |pn| format!(", PN {pn}"));
                    info!("{} (crew {}{pn})", class.name(), class.crew_size());
                }
            }
        }
        Operation::CreateClass { name, crew_size, portsmouth_number } => {
            let result = operations::create_dinghy_class(&client, &name, crew_size, portsmouth_number).await;
            report_created(&format!("Create dinghy class {name}"), result);
        }
        Operation::CreateRace { name, start, class, duration_minutes, laps } => {
            let duration = TimeDelta::minutes(duration_minutes);
            let result = operations::create_race(&client, &name, start, class.as_deref(), duration, laps).await;
            report_created(&format!("Create race {name}"), result);
        }
        Operation::CreateCompetitor { name } => {
            let result = operations::create_competitor(&client, &name).await;
            report_created(&format!("Create competitor {name}"), result);
        }
        Operation::CreateDinghy { sail_number, class } => {
            let result = operations::create_dinghy(&client, &sail_number, &class).await;
            report_created(&format!("Create dinghy {sail_number}"), result);
        }
        Operation::Enter { race, helm, sail_number } => {
            let result = enter_today(&client, &race, &helm, &sail_number).await;
            report(&format!("Enter {helm} sailing {sail_number} into {race}"), result);
        }
        Operation::Races { from, to } => {
            let window = session_window(from, to);
            if let Some(races) = report("List races", client.races_between(&window).await) {
                for race in races {
                    let start = race.planned_start().map_or_else(
                        || "--:--".to_string(),
                        |s| s.with_timezone(&Local).format("%H:%M").to_string(),
                    );
                    let class = race.dinghy_class().map_or("Handicap", |c| c.name());
                    info!("{start} {} ({class})", race.name());
                }
            }
        }
        Operation::StartConsole { from, to } => {
            let window = session_window(from, to);
            let mut console = StartConsole::new(client, keychain.clock(), window);
            console.run(stdin_lines(), keychain.update_stream(), shutdown_on_ctrl_c()).await;
            info!("Start console closed");
        }
        Operation::RaceConsole { race } => {
            let opened = open_race_console(&keychain, &race).await;
            if let Some(mut console) = report(&format!("Open race {race}"), opened) {
                console.run(stdin_lines(), keychain.update_stream(), shutdown_on_ctrl_c()).await;
                info!("Race console closed");
            }
        }
    }
}

async fn enter_today(client: &HTTPClient, race: &str, helm: &str, sail_number: &str) -> OpResult<()> {
    let found = operations::find_race(client, &SessionWindow::today(), race).await?;
    operations::enter(client, &found, helm, sail_number).await
}

async fn open_race_console(keychain: &Keychain, race: &str) -> OpResult<RaceConsole<HTTPClient>> {
    let client = keychain.client();
    let found = operations::find_race(&client, &SessionWindow::today(), race).await?;
    let url = link_of(&found, found.name())?;
    RaceConsole::open(client, &url, keychain.clock()).await
}

/// Prints the outcome of an operation and hands back its value on success.
fn report<T>(what: &str, result: OpResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            info!("{what}: success");
            Some(value)
        }
        Err(e) => {
            error!("{what}: failure: {e}");
            None
        }
    }
}

fn report_created<T: Resource>(what: &str, result: OpResult<T>) {
    if let Some(created) = report(what, result) {
        log!("Created at {}", created.url().unwrap_or("an unknown location"));
    }
}

/// Today's window between the given local times, 08:00 to 18:00 by default.
fn session_window(from: Option<NaiveTime>, to: Option<NaiveTime>) -> SessionWindow {
    let open = from.unwrap_or(SessionWindow::DEFAULT_OPEN);
    let close = to.unwrap_or(SessionWindow::DEFAULT_CLOSE);
    SessionWindow::on_date(Local::now().date_naive(), open, close, &Local).unwrap_or_else(|| {
        warn!("{open} to {close} does not exist today, using the default window");
        SessionWindow::today()
    })
}

fn stdin_lines() -> Lines<BufReader<Stdin>> { BufReader::new(tokio::io::stdin()).lines() }

fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });
    token
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("expected HH:MM, {e}"))
}

fn parse_start(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(start) = DateTime::parse_from_rfc3339(value) {
        return Ok(start.with_timezone(&Utc));
    }
    let local = match NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        Ok(naive) => naive,
        Err(_) => Local::now().date_naive().and_time(parse_time(value)?),
    };
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| format!("{value} does not exist in local time"))
}
