use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::http_response::empty::EmptyResponse;

/// Request type for entering a helm and dinghy into a race via POST /entries.
/// All three fields are resource URLs.
#[derive(serde::Serialize, Debug)]
pub struct CreateEntryRequest {
    pub race: String,
    pub helm: String,
    pub dinghy: String,
}

impl JSONBodyHTTPRequestType for CreateEntryRequest {
    type Body = CreateEntryRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for CreateEntryRequest {
    type Response = EmptyResponse;
    fn endpoint(&self) -> &str { "/entries" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
