//! HTTP-backed [`FacilityQueryClient`] for the places directory.
//!
//! [`FacilityQueryClient`] is synchronous so the scoring engine stays
//! embeddable in synchronous callers. This client bridges the async HTTP
//! call by blocking on a Tokio runtime it owns.

use std::time::Duration;

use civic_priority_core::{Coordinate, FacilityQueryClient, PlaceQueryError, RawPlace};
use log::debug;
use reqwest::{Client, StatusCode};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::directory::NearbySearchResponse;

/// Error type for [`HttpPlacesClient`] construction failures.
#[derive(Debug)]
pub enum PlacesClientBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
    /// The configured base URL cannot be parsed.
    InvalidBaseUrl(url::ParseError),
}

impl std::fmt::Display for PlacesClientBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
            Self::InvalidBaseUrl(err) => write!(f, "invalid places base URL: {err}"),
        }
    }
}

impl std::error::Error for PlacesClientBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::InvalidBaseUrl(err) => Some(err),
        }
    }
}

/// Default user agent for directory requests.
pub const DEFAULT_USER_AGENT: &str = "civic-priority/0.1";

/// Default directory endpoint.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`HttpPlacesClient`].
#[derive(Clone)]
pub struct HttpPlacesClientConfig {
    /// Directory endpoint, without the `nearbysearch/json` suffix.
    pub base_url: String,
    /// Credential sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpPlacesClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlacesClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpPlacesClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpPlacesClientConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the directory credential.
    ///
    /// Blank keys are treated as absent.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Places-directory client speaking the nearby-search JSON API.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the client blocks on the runtime it owns.
/// Inside a multi-threaded runtime it uses that runtime's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it
/// falls back to its own runtime, which may stall the caller's reactor.
///
/// # Examples
///
/// ```no_run
/// use civic_priority_core::{Coordinate, FacilityQueryClient};
/// use civic_priority_data::places::{HttpPlacesClient, HttpPlacesClientConfig};
///
/// let config = HttpPlacesClientConfig::default().with_api_key("secret");
/// let client = HttpPlacesClient::with_config(config)?;
/// let origin = Coordinate::new(28.6139, 77.2090)?;
/// let hospitals = client.nearby(&origin, "hospital", 5000)?;
/// println!("{} hospitals nearby", hospitals.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HttpPlacesClient {
    client: Client,
    config: HttpPlacesClientConfig,
    base_url: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpPlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlacesClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpPlacesClient {
    /// Create a client for the default endpoint using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, PlacesClientBuildError> {
        Self::with_config(HttpPlacesClientConfig::default().with_api_key(api_key))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpPlacesClientConfig) -> Result<Self, PlacesClientBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(PlacesClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(PlacesClientBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base_url,
            runtime,
        })
    }

    /// Build the nearby-search URL.
    ///
    /// The format is
    /// `{base_url}/nearbysearch/json?location={lat},{lng}&radius={m}&type={keyword}&key={key}`.
    fn build_nearby_url(&self, origin: &Coordinate, keyword: &str, radius_m: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["nearbysearch", "json"]);
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(
                    "location",
                    &format!("{},{}", origin.latitude(), origin.longitude()),
                )
                .append_pair("radius", &radius_m.to_string())
                .append_pair("type", keyword);
            if let Some(key) = &self.config.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }

    async fn fetch_nearby_async(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        let url = self.build_nearby_url(origin, keyword, radius_m);
        debug!("querying places directory for '{keyword}' within {radius_m} m");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?;
        classify_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?;
        decode_nearby_response(&body)
    }

    /// Convert a reqwest error to a [`PlaceQueryError`].
    ///
    /// The URL carries the credential, so it is stripped from the message.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> PlaceQueryError {
        if error.is_timeout() {
            return PlaceQueryError::transient(format!(
                "request timed out after {}s",
                self.config.timeout.as_secs()
            ));
        }
        PlaceQueryError::transient(error.without_url().to_string())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, PlacesClientBuildError> {
    let url = Url::parse(raw).map_err(PlacesClientBuildError::InvalidBaseUrl)?;
    if url.cannot_be_a_base() {
        return Err(PlacesClientBuildError::InvalidBaseUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(url)
}

/// Map an HTTP status to a query failure.
fn classify_status(status: StatusCode) -> Result<(), PlaceQueryError> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(PlaceQueryError::QuotaExceeded {
            message: status.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PlaceQueryError::AuthDenied {
            message: status.to_string(),
        }),
        _ if status.is_success() => Ok(()),
        _ => Err(PlaceQueryError::transient(format!(
            "unexpected HTTP status {status}"
        ))),
    }
}

/// Decode a nearby-search body into raw places.
///
/// # Errors
///
/// Malformed JSON becomes [`PlaceQueryError::TransientNetwork`]; directory
/// failure statuses map as described on [`NearbySearchResponse::into_places`].
///
/// # Examples
///
/// ```
/// use civic_priority_data::places::decode_nearby_response;
///
/// let places = decode_nearby_response(r#"{"status": "ZERO_RESULTS", "results": []}"#)?;
/// assert!(places.is_empty());
/// # Ok::<(), civic_priority_core::PlaceQueryError>(())
/// ```
pub fn decode_nearby_response(body: &str) -> Result<Vec<RawPlace>, PlaceQueryError> {
    let response: NearbySearchResponse = serde_json::from_str(body)
        .map_err(|err| PlaceQueryError::transient(format!("malformed response: {err}")))?;
    response.into_places()
}

impl FacilityQueryClient for HttpPlacesClient {
    /// Query the directory for places tagged `keyword`.
    ///
    /// # Runtime requirements
    ///
    /// Inside an existing Tokio runtime the runtime should be multi-threaded;
    /// see the type-level documentation.
    fn nearby(
        &self,
        origin: &Coordinate,
        keyword: &str,
        radius_m: u32,
    ) -> Result<Vec<RawPlace>, PlaceQueryError> {
        if !self.is_configured() {
            return Err(PlaceQueryError::AuthDenied {
                message: "no places API key configured".to_string(),
            });
        }

        let future = self.fetch_nearby_async(origin, keyword, radius_m);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn origin() -> Coordinate {
        Coordinate::new(28.6139, 77.209).expect("valid coordinate")
    }

    fn client(base_url: &str, key: &str) -> HttpPlacesClient {
        HttpPlacesClient::with_config(HttpPlacesClientConfig::new(base_url).with_api_key(key))
            .expect("client should build")
    }

    #[rstest]
    fn build_nearby_url_formats_query(origin: Coordinate) {
        let client = client("https://places.example.com/api/place", "k123");

        let url = client.build_nearby_url(&origin, "hospital", 5000);

        assert_eq!(
            url.as_str(),
            "https://places.example.com/api/place/nearbysearch/json?location=28.6139%2C77.209&radius=5000&type=hospital&key=k123"
        );
    }

    #[rstest]
    fn build_nearby_url_strips_trailing_slash(origin: Coordinate) {
        let client = client("https://places.example.com/api/place/", "k");

        let url = client.build_nearby_url(&origin, "bank", 2000);

        assert_eq!(url.path(), "/api/place/nearbysearch/json");
    }

    #[rstest]
    fn build_nearby_url_encodes_keyword(origin: Coordinate) {
        let client = client("https://places.example.com", "k");

        let url = client.build_nearby_url(&origin, "city hall&x", 100);

        assert!(url.as_str().contains("type=city+hall%26x"));
    }

    #[rstest]
    #[case(StatusCode::TOO_MANY_REQUESTS, "quota")]
    #[case(StatusCode::UNAUTHORIZED, "auth")]
    #[case(StatusCode::FORBIDDEN, "auth")]
    #[case(StatusCode::BAD_GATEWAY, "transient")]
    #[case(StatusCode::OK, "ok")]
    fn classify_status_maps_codes(#[case] status: StatusCode, #[case] expected: &str) {
        let outcome = match classify_status(status) {
            Ok(()) => "ok",
            Err(PlaceQueryError::QuotaExceeded { .. }) => "quota",
            Err(PlaceQueryError::AuthDenied { .. }) => "auth",
            Err(PlaceQueryError::TransientNetwork { .. }) => "transient",
            Err(PlaceQueryError::Cancelled) => "cancelled",
        };
        assert_eq!(outcome, expected);
    }

    #[rstest]
    fn malformed_body_is_transient() {
        let err = decode_nearby_response("<html>").expect_err("should fail");
        assert!(err.is_retryable());
    }

    #[rstest]
    fn blank_key_leaves_client_unconfigured(origin: Coordinate) {
        let client = client(DEFAULT_BASE_URL, "   ");

        assert!(!client.is_configured());
        let err = client
            .nearby(&origin, "hospital", 1000)
            .expect_err("should refuse");
        assert!(matches!(err, PlaceQueryError::AuthDenied { .. }));
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = HttpPlacesClient::with_config(HttpPlacesClientConfig::new("not a url"))
            .expect_err("should fail");
        assert!(matches!(err, PlacesClientBuildError::InvalidBaseUrl(_)));
    }

    #[rstest]
    fn debug_output_redacts_key() {
        let config = HttpPlacesClientConfig::default().with_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpPlacesClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent/1.0")
            .with_api_key("k");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.api_key.as_deref(), Some("k"));
    }
}
