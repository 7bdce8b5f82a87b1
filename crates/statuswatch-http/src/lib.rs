// # HTTP Status Fetcher
//
// This crate provides the reqwest-based fetcher for the status monitor.
//
// ## Behavior
//
// One GET per call against `base_url + endpoint path`:
// - With a stored validator, the request carries `If-None-Match`
// - 304 → `FetchOutcome::Unchanged`
// - 200 → JSON body decoded, `ETag` returned with its quotes stripped
// - Anything else, or a transport failure / timeout → `FetchOutcome::Failed`
//
// The fetcher keeps no state between calls. Validators are owned by the
// Monitor, which hands the stored one back on the next call.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use statuswatch_core::config::MonitorConfig;
use statuswatch_core::traits::{Endpoint, FetchOutcome, StatusFetcher};
use statuswatch_core::{Error, Result};
use tracing::debug;

/// HTTP status fetcher
pub struct HttpStatusFetcher {
    /// Status page base URL, without trailing slash
    base_url: String,

    /// HTTP client (timeout and User-Agent preconfigured)
    client: reqwest::Client,
}

impl HttpStatusFetcher {
    /// Create a fetcher from monitor configuration
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Create a fetcher around an existing client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    async fn fetch(&self, endpoint: Endpoint, validator: Option<&str>) -> FetchOutcome {
        let url = self.url(endpoint);

        let mut request = self.client.get(&url);
        if let Some(validator) = validator {
            request = request.header(IF_NONE_MATCH, if_none_match(validator));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return FetchOutcome::Failed(Error::network(format!("Request to {} timed out", url)));
            }
            Err(e) => {
                return FetchOutcome::Failed(Error::network(format!("Request to {} failed: {}", url, e)));
            }
        };

        match response.status() {
            StatusCode::NOT_MODIFIED => {
                debug!("{} not modified", endpoint);
                FetchOutcome::Unchanged
            }
            StatusCode::OK => {
                let validator = response
                    .headers()
                    .get(ETAG)
                    .and_then(|value| value.to_str().ok())
                    .map(parse_validator)
                    .filter(|v| !v.is_empty());

                let body = match response.bytes().await {
                    Ok(body) => body,
                    Err(e) => {
                        return FetchOutcome::Failed(Error::network(format!(
                            "Failed to read response from {}: {}",
                            url, e
                        )));
                    }
                };

                match serde_json::from_slice(&body) {
                    Ok(payload) => FetchOutcome::Fresh { payload, validator },
                    Err(e) => FetchOutcome::Failed(Error::Decode(e)),
                }
            }
            status => FetchOutcome::Failed(Error::http(status.as_u16())),
        }
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}

/// Strip the quotes from an `ETag` header value
///
/// `"abc"` becomes `abc`; a weak `W/"abc"` becomes `W/abc`.
pub fn parse_validator(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix("W/") {
        Some(tag) => format!("W/{}", tag.trim_matches('"')),
        None => raw.trim_matches('"').to_string(),
    }
}

/// Re-quote a stored validator for the `If-None-Match` header
pub fn if_none_match(validator: &str) -> String {
    match validator.strip_prefix("W/") {
        Some(tag) => format!("W/\"{}\"", tag),
        None => format!("\"{}\"", validator),
    }
}
