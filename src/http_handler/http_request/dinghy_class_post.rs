use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::http_handler::{DinghyClass, http_response::resource::ResourceResponse};

/// Request type for creating a dinghy class via POST /dinghyClasses.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateDinghyClassRequest {
    pub name: String,
    pub crew_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portsmouth_number: Option<u16>,
}

impl JSONBodyHTTPRequestType for CreateDinghyClassRequest {
    type Body = CreateDinghyClassRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for CreateDinghyClassRequest {
    type Response = ResourceResponse<DinghyClass>;
    fn endpoint(&self) -> &str { "/dinghyClasses" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
