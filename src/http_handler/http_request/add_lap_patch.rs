use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{Lap, http_response::empty::EmptyResponse};

/// Request type for appending a lap to an entry via PATCH {entry}/addLap.
#[derive(Debug)]
pub struct AddLapRequest {
    endpoint: String,
    lap: Lap,
}

impl AddLapRequest {
    pub fn new(entry_url: &str, lap: Lap) -> Self {
        Self { endpoint: format!("{}/addLap", entry_url.trim_end_matches('/')), lap }
    }
}

impl JSONBodyHTTPRequestType for AddLapRequest {
    type Body = Lap;
    fn body(&self) -> &Self::Body { &self.lap }
}

impl HTTPRequestType for AddLapRequest {
    type Response = EmptyResponse;
    fn endpoint(&self) -> &str { &self.endpoint }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Patch }
}
