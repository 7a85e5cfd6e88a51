use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{Dinghy, http_response::resource::ResourceResponse};

/// Request type for registering a dinghy via POST /dinghies.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateDinghyRequest {
    pub sail_number: String,
    /// URL of the dinghy's class.
    pub dinghy_class: String,
}

impl JSONBodyHTTPRequestType for CreateDinghyRequest {
    type Body = CreateDinghyRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for CreateDinghyRequest {
    type Response = ResourceResponse<Dinghy>;
    fn endpoint(&self) -> &str { "/dinghies" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
