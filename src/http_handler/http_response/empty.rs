use crate::http_handler::http_response::response_common::{HTTPResponseType, ResponseError};

/// Response whose body, if any, is of no interest. Only the status is checked.
pub(crate) struct EmptyResponse {}

impl HTTPResponseType for EmptyResponse {
    type ParsedResponseType = ();

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        Self::unwrap_return_code(response).await?;
        Ok(())
    }
}
