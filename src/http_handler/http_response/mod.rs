pub mod collection;
pub mod empty;
pub mod resource;
pub mod response_common;
pub mod server_time;
