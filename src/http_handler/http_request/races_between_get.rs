use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{Race, http_response::collection::CollectionResponse};
use chrono::{DateTime, SecondsFormat, Utc};

/// Projection that inlines the dinghy class into each race.
pub(crate) const RACE_PROJECTION: &str = "inlineDinghyClass";

/// Request type for the races planned to start within a time window,
/// sorted by planned start time.
#[derive(Debug)]
pub struct RacesBetweenRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub page: u32,
    pub size: u32,
}

impl NoBodyHTTPRequestType for RacesBetweenRequest {}

impl HTTPRequestType for RacesBetweenRequest {
    type Response = CollectionResponse<Race>;
    fn endpoint(&self) -> &str { "/races/search/findByPlannedStartTimeBetween" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startTime", self.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endTime", self.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("projection", RACE_PROJECTION.to_string()),
            ("sort", "plannedStartTime,asc".to_string()),
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}
