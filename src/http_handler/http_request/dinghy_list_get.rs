use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{Dinghy, http_response::collection::CollectionResponse};

/// Request type for one page of GET /dinghies, sorted by sail number.
#[derive(Debug)]
pub struct DinghyListRequest {
    pub page: u32,
    pub size: u32,
}

impl NoBodyHTTPRequestType for DinghyListRequest {}

impl HTTPRequestType for DinghyListRequest {
    type Response = CollectionResponse<Dinghy>;
    fn endpoint(&self) -> &str { "/dinghies" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", "sailNumber,asc".to_string()),
        ]
    }
}
