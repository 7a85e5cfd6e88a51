use crate::http_handler::{
    OpResult, http_client::HTTPClient, http_response::collection::CollectionResponse,
};
use request_common::{HTTPRequestType, NoBodyHTTPRequestType};

pub mod add_lap_patch;
pub mod competitor_list_get;
pub mod competitor_post;
pub mod dinghy_class_list_get;
pub mod dinghy_class_post;
pub mod dinghy_list_get;
pub mod dinghy_post;
pub mod entry_list_get;
pub mod entry_post;
pub mod race_get;
pub mod race_patch;
pub mod race_post;
pub mod races_between_get;
pub mod request_common;
pub mod server_time_get;

/// Page size used for list requests when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Fetches every page of a paged collection. `make` builds the request for
/// a page number, starting at 0.
pub(crate) async fn collect_pages<T, R>(client: &HTTPClient, make: impl Fn(u32) -> R) -> OpResult<Vec<T>>
where
    T: for<'de> serde::Deserialize<'de>,
    R: NoBodyHTTPRequestType + HTTPRequestType<Response = CollectionResponse<T>>,
{
    let mut items = Vec::new();
    let mut page = 0;
    loop {
        let collection = make(page).send_request(client).await?;
        let meta = collection.page();
        items.extend(collection.into_items());
        match meta {
            Some(m) if !m.is_last() => page += 1,
            _ => return Ok(items),
        }
    }
}
