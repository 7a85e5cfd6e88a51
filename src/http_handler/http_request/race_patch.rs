use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{Race, http_response::resource::ResourceResponse};
use chrono::{DateTime, Utc};

/// Fields of a race that may be changed once it has been created.
/// Absent fields are left untouched by the backend.
#[derive(serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RacePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_laps: Option<u32>,
}

/// Request type for a partial update of a race via PATCH on its self link.
#[derive(Debug)]
pub struct UpdateRaceRequest {
    pub url: String,
    pub patch: RacePatch,
}

impl JSONBodyHTTPRequestType for UpdateRaceRequest {
    type Body = RacePatch;
    fn body(&self) -> &Self::Body { &self.patch }
}

impl HTTPRequestType for UpdateRaceRequest {
    type Response = ResourceResponse<Race>;
    fn endpoint(&self) -> &str { &self.url }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Patch }
}
