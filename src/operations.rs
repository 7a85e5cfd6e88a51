use crate::console::options::{dinghy_class_options, race_options, select};
use crate::console::race_backend::{RaceBackend, link_of};
use crate::http_handler::{
    Competitor, Dinghy, DinghyClass, OpResult, Race,
    http_client::HTTPClient,
    http_request::{
        DEFAULT_PAGE_SIZE, collect_pages,
        competitor_list_get::CompetitorListRequest,
        competitor_post::CreateCompetitorRequest,
        dinghy_class_list_get::DinghyClassListRequest,
        dinghy_class_post::CreateDinghyClassRequest,
        dinghy_list_get::DinghyListRequest,
        dinghy_post::CreateDinghyRequest,
        entry_post::CreateEntryRequest,
        race_post::CreateRaceRequest,
        request_common::{JSONBodyHTTPRequestType, RequestError},
    },
};
use crate::start_sequence::SessionWindow;
use chrono::{DateTime, TimeDelta, Utc};

pub async fn dinghy_classes(client: &HTTPClient) -> OpResult<Vec<DinghyClass>> {
    collect_pages(client, |page| DinghyClassListRequest { page, size: DEFAULT_PAGE_SIZE }).await
}

pub async fn create_dinghy_class(
    client: &HTTPClient,
    name: &str,
    crew_size: u8,
    portsmouth_number: Option<u16>,
) -> OpResult<DinghyClass> {
    CreateDinghyClassRequest { name: name.to_string(), crew_size, portsmouth_number }
        .send_request(client)
        .await
}

/// Creates a race. `class` names the dinghy class; `None` or the handicap
/// option creates a handicap race.
pub async fn create_race(
    client: &HTTPClient,
    name: &str,
    planned_start_time: DateTime<Utc>,
    class: Option<&str>,
    duration: TimeDelta,
    planned_laps: u32,
) -> OpResult<Race> {
    let dinghy_class = match class {
        Some(class_name) => {
            let options = dinghy_class_options(&dinghy_classes(client).await?);
            let option = select(&options, class_name)
                .ok_or_else(|| RequestError::unknown("dinghy class", class_name))?;
            option.value().map(str::to_string)
        }
        None => None,
    };
    CreateRaceRequest { name: name.to_string(), planned_start_time, dinghy_class, duration, planned_laps }
        .send_request(client)
        .await
}

pub async fn create_competitor(client: &HTTPClient, name: &str) -> OpResult<Competitor> {
    CreateCompetitorRequest { name: name.to_string() }.send_request(client).await
}

pub async fn create_dinghy(client: &HTTPClient, sail_number: &str, class: &str) -> OpResult<Dinghy> {
    let classes = dinghy_classes(client).await?;
    let dinghy_class = classes
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(class))
        .ok_or_else(|| RequestError::unknown("dinghy class", class))?;
    CreateDinghyRequest {
        sail_number: sail_number.to_string(),
        dinghy_class: link_of(dinghy_class, dinghy_class.name())?,
    }
    .send_request(client)
    .await
}

/// Races of `window` selected by name.
pub async fn find_race(client: &HTTPClient, window: &SessionWindow, name: &str) -> OpResult<Race> {
    let races = client.races_between(window).await?;
    let options = race_options(&races);
    let url = select(&options, name)
        .and_then(|o| o.value())
        .ok_or_else(|| RequestError::unknown("race", name))?;
    client.race(url).await
}

/// Enters the helm sailing the dinghy with `sail_number` into `race`.
pub async fn enter(client: &HTTPClient, race: &Race, helm: &str, sail_number: &str) -> OpResult<()> {
    let competitors =
        collect_pages(client, |page| CompetitorListRequest { page, size: DEFAULT_PAGE_SIZE }).await?;
    let competitor = competitors
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(helm))
        .ok_or_else(|| RequestError::unknown("competitor", helm))?;
    let dinghies = collect_pages(client, |page| DinghyListRequest { page, size: DEFAULT_PAGE_SIZE }).await?;
    let dinghy = dinghies
        .iter()
        .find(|d| d.sail_number().eq_ignore_ascii_case(sail_number))
        .ok_or_else(|| RequestError::unknown("sail number", sail_number))?;
    if let (Some(race_class), Some(dinghy_class)) = (race.dinghy_class(), dinghy.dinghy_class()) {
        if race_class.name() != dinghy_class.name() {
            let message = format!("{sail_number} is a {}, {} is for {}", dinghy_class.name(), race.name(), race_class.name());
            return Err(RequestError::Invalid { message }.into());
        }
    }
    CreateEntryRequest {
        race: link_of(race, race.name())?,
        helm: link_of(competitor, competitor.name())?,
        dinghy: link_of(dinghy, dinghy.sail_number())?,
    }
    .send_request(client)
    .await
}
