use crate::http_handler::http_response::response_common::{
    HTTPResponseType, JSONBodyHTTPResponseType, ResponseError,
};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Paging information of a HAL collection.
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    size: u32,
    total_elements: u64,
    total_pages: u32,
    number: u32,
}

impl PageMetadata {
    pub fn total_elements(&self) -> u64 { self.total_elements }
    pub fn total_pages(&self) -> u32 { self.total_pages }
    pub fn number(&self) -> u32 { self.number }
    pub fn is_last(&self) -> bool { self.number + 1 >= self.total_pages }
}

/// A HAL collection, `{"_embedded": {"<relation>": [...]}, "page": {...}}`.
///
/// The relation name differs per resource and is not checked; all embedded
/// lists are concatenated. An empty collection may omit `_embedded` entirely.
#[derive(serde::Deserialize, Debug)]
pub struct HalCollection<T> {
    #[serde(rename = "_embedded", default = "HashMap::new")]
    embedded: HashMap<String, Vec<T>>,
    #[serde(default)]
    page: Option<PageMetadata>,
}

impl<T> HalCollection<T> {
    pub fn page(&self) -> Option<PageMetadata> { self.page }
    pub fn into_items(self) -> Vec<T> { self.embedded.into_values().flatten().collect() }
}

pub(crate) struct CollectionResponse<T> {
    _item: PhantomData<T>,
}

impl<T> JSONBodyHTTPResponseType for CollectionResponse<T> where T: for<'de> serde::Deserialize<'de> {}

impl<T> HTTPResponseType for CollectionResponse<T>
where T: for<'de> serde::Deserialize<'de>
{
    type ParsedResponseType = HalCollection<T>;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Self::parse_json_body(resp).await
    }
}
