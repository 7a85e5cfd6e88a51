use crate::http_handler::http_response::response_common::{
    HTTPResponseType, JSONBodyHTTPResponseType, ResponseError,
};
use std::marker::PhantomData;

/// Response carrying a single HAL resource, as returned by GET on a resource
/// link, by POST on a collection and by PATCH.
pub(crate) struct ResourceResponse<T> {
    _resource: PhantomData<T>,
}

impl<T> JSONBodyHTTPResponseType for ResourceResponse<T> where T: for<'de> serde::Deserialize<'de> {}

impl<T> HTTPResponseType for ResourceResponse<T>
where T: for<'de> serde::Deserialize<'de>
{
    type ParsedResponseType = T;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Self::parse_json_body(resp).await
    }
}
