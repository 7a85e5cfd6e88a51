use crate::event;
use std::collections::HashMap;

pub type SubscriptionId = u64;

type UpdateHandler = Box<dyn FnMut(&str)>;

/// Observer lists for "resource updated" notifications, keyed by resource URL.
///
/// A handler registered for a URL is called for updates of that URL and of
/// any resource below it, so registering a collection URL such as
/// `.../races` observes every race.
#[derive(Default)]
pub struct UpdateHub {
    subscriptions: HashMap<String, Vec<(SubscriptionId, UpdateHandler)>>,
    next_id: SubscriptionId,
}

impl UpdateHub {
    pub fn new() -> Self { Self::default() }

    pub fn register<F>(&mut self, url: &str, handler: F) -> SubscriptionId
    where F: FnMut(&str) + 'static {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions
            .entry(Self::normalise(url).to_string())
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Removes a subscription. Returns `false` if the id was unknown.
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let mut found = false;
        self.subscriptions.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            found |= before != handlers.len();
            !handlers.is_empty()
        });
        found
    }

    pub fn subscription_count(&self) -> usize { self.subscriptions.values().map(Vec::len).sum() }

    /// Calls every handler observing `url`. Returns the number of handlers called.
    pub fn notify(&mut self, url: &str) -> usize {
        let updated = Self::normalise(url);
        let mut called = 0;
        for (key, handlers) in &mut self.subscriptions {
            if Self::covers(key, updated) {
                for (_, handler) in handlers.iter_mut() {
                    handler(updated);
                    called += 1;
                }
            }
        }
        event!("Update for {updated} delivered to {called} observer(s)");
        called
    }

    fn covers(key: &str, updated: &str) -> bool {
        updated == key || updated.strip_prefix(key).is_some_and(|rest| rest.starts_with('/'))
    }

    /// Drops query, fragment, and trailing slashes so links compare equal.
    fn normalise(url: &str) -> &str {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        url[..end].trim_end_matches('/')
    }
}
