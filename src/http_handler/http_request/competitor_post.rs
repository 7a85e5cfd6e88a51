use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{Competitor, http_response::resource::ResourceResponse};

/// Request type for creating a competitor via POST /competitors.
#[derive(serde::Serialize, Debug)]
pub struct CreateCompetitorRequest {
    pub name: String,
}

impl JSONBodyHTTPRequestType for CreateCompetitorRequest {
    type Body = CreateCompetitorRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for CreateCompetitorRequest {
    type Response = ResourceResponse<Competitor>;
    fn endpoint(&self) -> &str { "/competitors" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
