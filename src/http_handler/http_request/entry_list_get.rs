use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{Entry, http_response::collection::CollectionResponse};

/// Request type for all entries of a race, with helm, dinghy and laps inlined.
#[derive(Debug)]
pub struct EntryListRequest {
    pub race_url: String,
}

impl NoBodyHTTPRequestType for EntryListRequest {}

impl HTTPRequestType for EntryListRequest {
    type Response = CollectionResponse<Entry>;
    fn endpoint(&self) -> &str { "/entries/search/findByRace" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("race", self.race_url.clone()),
            ("projection", "entryWithLaps".to_string()),
        ]
    }
}
