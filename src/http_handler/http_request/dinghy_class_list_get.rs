use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::http_handler::{DinghyClass, http_response::collection::CollectionResponse};

/// Request type for one page of GET /dinghyClasses, sorted by name.
#[derive(Debug)]
pub struct DinghyClassListRequest {
    pub page: u32,
    pub size: u32,
}

impl NoBodyHTTPRequestType for DinghyClassListRequest {}

impl HTTPRequestType for DinghyClassListRequest {
    type Response = CollectionResponse<DinghyClass>;
    fn endpoint(&self) -> &str { "/dinghyClasses" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", "name,asc".to_string()),
        ]
    }
}
