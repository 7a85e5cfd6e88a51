use crate::http_handler::http_client::HTTPClient;
use crate::{event, warn};
use futures::StreamExt;
use reqwest_eventsource::{CannotCloneRequestError, Event, EventSource, retry::Never};

/// Server-sent event stream of the backend's update notifications.
/// Each message carries the URL of the updated resource.
///
/// The stream does not reconnect. Once the backend closes it or an error
/// occurs it is finished and `next_update` returns `None`.
pub struct UpdateStream {
    source: EventSource,
    finished: bool,
}

impl UpdateStream {
    /// Endpoint of the notification stream relative to the API root.
    pub const ENDPOINT: &'static str = "/updates";

    pub(crate) fn connect(client: &HTTPClient, endpoint: &str) -> Result<Self, CannotCloneRequestError> {
        let request = client.client().get(client.resolve(endpoint));
        let mut source = EventSource::new(request)?;
        source.set_retry_policy(Box::new(Never));
        Ok(Self { source, finished: false })
    }

    pub fn is_finished(&self) -> bool { self.finished }

    /// Waits for the next updated resource URL.
    pub async fn next_update(&mut self) -> Option<String> {
        while !self.finished {
            match self.source.next().await {
                Some(Ok(Event::Open)) => event!("Update stream connected"),
                Some(Ok(Event::Message(msg))) => {
                    let url = msg.data.trim();
                    if !url.is_empty() {
                        return Some(url.to_string());
                    }
                }
                Some(Err(e)) => {
                    warn!("Update stream closed: {e}. Updates will not be shown until restart.");
                    self.close();
                }
                None => self.close(),
            }
        }
        None
    }

    fn close(&mut self) {
        self.source.close();
        self.finished = true;
    }
}
