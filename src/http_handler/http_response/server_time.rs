use crate::http_handler::http_response::response_common::{
    HTTPResponseType, JSONBodyHTTPResponseType, ResponseError,
};
use chrono::{DateTime, Utc};

/// Response type for the /clock/now endpoint
#[derive(serde::Deserialize, Debug)]
pub(crate) struct ServerTimeResponse {
    now: DateTime<Utc>,
}

impl JSONBodyHTTPResponseType for ServerTimeResponse {}

impl HTTPResponseType for ServerTimeResponse {
    type ParsedResponseType = DateTime<Utc>;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Ok(Self::parse_json_body::<ServerTimeResponse>(resp).await?.now)
    }
}
