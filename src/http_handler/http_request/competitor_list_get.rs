use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{Competitor, http_response::collection::CollectionResponse};

/// Request type for one page of GET /competitors, sorted by name.
#[derive(Debug)]
pub struct CompetitorListRequest {
    pub page: u32,
    pub size: u32,
}

impl NoBodyHTTPRequestType for CompetitorListRequest {}

impl HTTPRequestType for CompetitorListRequest {
    type Response = CollectionResponse<Competitor>;
    fn endpoint(&self) -> &str { "/competitors" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", "name,asc".to_string()),
        ]
    }
}
