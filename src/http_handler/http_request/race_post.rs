use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{Race, http_handler_common::iso_duration, http_response::resource::ResourceResponse};
use chrono::{DateTime, TimeDelta, Utc};

/// Request type for creating a race via POST /races.
///
/// The dinghy class is referenced by its URL; `None` creates a handicap race.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateRaceRequest {
    pub name: String,
    pub planned_start_time: DateTime<Utc>,
    pub dinghy_class: Option<String>,
    #[serde(with = "iso_duration")]
    pub duration: TimeDelta,
    pub planned_laps: u32,
}

impl JSONBodyHTTPRequestType for CreateRaceRequest {
    type Body = CreateRaceRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for CreateRaceRequest {
    type Response = ResourceResponse<Race>;
    fn endpoint(&self) -> &str { "/races" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
