use crate::http_handler::http_client::HTTPClient;
use crate::timing::Clock;
use crate::updates::UpdateStream;
use crate::{log, warn};
use std::rc::Rc;

/// Struct bundling what every operation needs: the HTTP client of the race
/// backend and where its update notifications are published.
#[derive(Clone, Debug)]
pub struct Keychain {
    /// The HTTP client for all REST calls.
    client: Rc<HTTPClient>,
    /// Endpoint of the update stream, relative to the API root or absolute.
    updates_endpoint: String,
}

impl Keychain {
    /// Creates a new `Keychain`.
    ///
    /// # Arguments
    /// - `base_url`: Root URL of the backend's REST API.
    /// - `updates_url`: Location of the update stream, defaults to
    ///   [`UpdateStream::ENDPOINT`] below `base_url`.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn new(base_url: &str, updates_url: Option<&str>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Rc::new(HTTPClient::new(base_url)?),
            updates_endpoint: updates_url.unwrap_or(UpdateStream::ENDPOINT).to_string(),
        })
    }

    /// Provides a cloned reference to the HTTP client.
    pub fn client(&self) -> Rc<HTTPClient> { Rc::clone(&self.client) }

    /// A fresh clock on the system time for a console.
    pub fn clock(&self) -> Clock { Clock::system() }

    /// Opens the update stream. Consoles keep working without it, they just
    /// stop reacting to changes made elsewhere.
    pub fn update_stream(&self) -> Option<UpdateStream> {
        match UpdateStream::connect(&self.client, &self.updates_endpoint) {
            Ok(stream) => {
                log!("Listening for updates at {}", self.client.resolve(&self.updates_endpoint));
                Some(stream)
            }
            Err(e) => {
                warn!("Cannot listen for updates: {e}");
                None
            }
        }
    }
}
