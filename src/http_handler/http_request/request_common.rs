use crate::http_handler::{
    HTTPError, http_client::HTTPClient, http_response::response_common::HTTPResponseType,
};
use strum_macros::Display;

/// Media type the backend serves its resources in.
const HAL_JSON: &str = "application/hal+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum HTTPRequestMethod {
    #[strum(to_string = "GET")]
    Get,
    #[strum(to_string = "POST")]
    Post,
    #[strum(to_string = "PATCH")]
    Patch,
}

impl From<HTTPRequestMethod> for reqwest::Method {
    fn from(value: HTTPRequestMethod) -> Self {
        match value {
            HTTPRequestMethod::Get => reqwest::Method::GET,
            HTTPRequestMethod::Post => reqwest::Method::POST,
            HTTPRequestMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    #[strum(to_string = "Could not build request: {message}")]
    Build { message: String },
    #[strum(to_string = "Could not encode request body: {message}")]
    Body { message: String },
    #[strum(to_string = "{resource} has no link to the backend")]
    MissingLink { resource: String },
    #[strum(to_string = "Unknown {kind} \"{name}\"")]
    Unknown { kind: String, name: String },
    #[strum(to_string = "{message}")]
    Invalid { message: String },
    #[strum(to_string = "{race} has not started yet")]
    NotStarted { race: String },
}

impl RequestError {
    pub fn unknown(kind: &str, name: &str) -> Self {
        RequestError::Unknown { kind: kind.to_string(), name: name.to_string() }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_body() {
            RequestError::Body { message: value.to_string() }
        } else {
            RequestError::Build { message: value.to_string() }
        }
    }
}

pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// Path relative to the API root, or an absolute HAL link.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    fn header_params(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(HAL_JSON),
        );
        headers
    }
    fn query_params(&self) -> Vec<(&'static str, String)> { Vec::new() }

    fn get_request_base(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = client.resolve(self.endpoint());
        let mut builder = client
            .client()
            .request(self.request_method().into(), url)
            .headers(self.header_params());
        let query = self.query_params();
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder
    }
}

pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, HTTPError> {
        let response = self.get_request_base(client).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    type Body: serde::Serialize;
    fn body(&self) -> &Self::Body;

    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, HTTPError> {
        let response = self.get_request_base(client).json(self.body()).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}
