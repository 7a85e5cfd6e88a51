use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::http_response::server_time::ServerTimeResponse;

/// Request type for the backend's current time, used to sync the race clock.
#[derive(Debug)]
pub struct ServerTimeRequest {}

impl NoBodyHTTPRequestType for ServerTimeRequest {}

impl HTTPRequestType for ServerTimeRequest {
    type Response = ServerTimeResponse;
    fn endpoint(&self) -> &str { "/clock/now" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
