/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and default settings.
///
/// This client is used for all REST calls to the race backend.
/// It sets a fixed timeout and allows easy reuse of the HTTP client infrastructure.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all relative endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Request timeout applied to every call.
    const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

    /// Constructs a new `HTTPClient` with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"http://localhost:8081/dinghyracing/api"`).
    ///
    /// # Errors
    /// Fails if the TLS backend or resolver cannot be initialised.
    pub(crate) fn new(base_url: &str) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder().timeout(Self::TIMEOUT).build()?,
            base_url: String::from(base_url.trim_end_matches('/')),
        })
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(crate) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }

    /// Resolves an endpoint against the base URL.
    ///
    /// HAL links handed out by the backend are already absolute and are
    /// returned unchanged.
    pub(crate) fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }
}
