use crate::http_handler::{
    Entry, HTTPError, Lap, OpResult, Race, Resource,
    http_client::HTTPClient,
    http_request::{
        DEFAULT_PAGE_SIZE,
        add_lap_patch::AddLapRequest,
        collect_pages,
        entry_list_get::EntryListRequest,
        race_get::RaceRequest,
        race_patch::{RacePatch, UpdateRaceRequest},
        races_between_get::RacesBetweenRequest,
        request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType, RequestError},
        server_time_get::ServerTimeRequest,
    },
};
use crate::start_sequence::SessionWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// What the consoles need from the race backend.
#[async_trait(?Send)]
pub trait RaceBackend {
    /// Races planned to start within `window`, in start order.
    async fn races_between(&self, window: &SessionWindow) -> OpResult<Vec<Race>>;
    async fn race(&self, url: &str) -> OpResult<Race>;
    async fn reschedule_race(&self, race: &Race, new_start: DateTime<Utc>) -> OpResult<Race>;
    async fn entries(&self, race: &Race) -> OpResult<Vec<Entry>>;
    async fn add_lap(&self, entry: &Entry, lap: Lap) -> OpResult<()>;
    async fn server_time(&self) -> OpResult<DateTime<Utc>>;
    /// URL of the race collection, observed for update notifications.
    fn races_url(&self) -> String;
    fn entries_url(&self) -> String;
}

pub(crate) fn link_of<R: Resource>(resource: &R, what: &str) -> OpResult<String> {
    resource
        .url()
        .map(str::to_string)
        .ok_or_else(|| HTTPError::from(RequestError::MissingLink { resource: what.to_string() }))
}

#[async_trait(?Send)]
impl RaceBackend for HTTPClient {
    async fn races_between(&self, window: &SessionWindow) -> OpResult<Vec<Race>> {
        collect_pages(self, |page| RacesBetweenRequest {
            start: window.start(),
            end: window.end(),
            page,
            size: DEFAULT_PAGE_SIZE,
        })
        .await
    }

    async fn race(&self, url: &str) -> OpResult<Race> {
        RaceRequest { url: url.to_string() }.send_request(self).await
    }

    async fn reschedule_race(&self, race: &Race, new_start: DateTime<Utc>) -> OpResult<Race> {
        let url = link_of(race, race.name())?;
        let patch = RacePatch { planned_start_time: Some(new_start), ..RacePatch::default() };
        UpdateRaceRequest { url, patch }.send_request(self).await
    }

    async fn entries(&self, race: &Race) -> OpResult<Vec<Entry>> {
        let race_url = link_of(race, race.name())?;
        EntryListRequest { race_url }.send_request(self).await.map(|c| c.into_items())
    }

    async fn add_lap(&self, entry: &Entry, lap: Lap) -> OpResult<()> {
        let entry_url = link_of(entry, entry.dinghy().sail_number())?;
        AddLapRequest::new(&entry_url, lap).send_request(self).await
    }

    async fn server_time(&self) -> OpResult<DateTime<Utc>> { ServerTimeRequest {}.send_request(self).await }

    fn races_url(&self) -> String { self.resolve("/races") }
    fn entries_url(&self) -> String { self.resolve("/entries") }
}
