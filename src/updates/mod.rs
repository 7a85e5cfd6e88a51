mod update_hub;
mod update_stream;

pub use update_hub::{SubscriptionId, UpdateHub};
pub use update_stream::UpdateStream;
