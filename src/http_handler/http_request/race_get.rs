use super::races_between_get::RACE_PROJECTION;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{Race, http_response::resource::ResourceResponse};

/// Request type for a single race, addressed by its self link.
#[derive(Debug)]
pub struct RaceRequest {
    pub url: String,
}

impl NoBodyHTTPRequestType for RaceRequest {}

impl HTTPRequestType for RaceRequest {
    type Response = ResourceResponse<Race>;
    fn endpoint(&self) -> &str { &self.url }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("projection", RACE_PROJECTION.to_string())]
    }
}
