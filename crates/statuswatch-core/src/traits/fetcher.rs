// # Status Fetcher Trait
//
// Defines the interface for retrieving one status endpoint.
//
// ## Contract
//
// A fetcher performs a single conditional GET and reports the outcome as a
// value. It never returns an error past its boundary and never stores the
// cache validator itself: the `Monitor` owns validators and passes the stored
// one back on the next call for the same endpoint.
//
// ## Implementations
//
// - reqwest-based: `statuswatch-http` crate
// - Scripted doubles in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use statuswatch_core::traits::{Endpoint, FetchOutcome, StatusFetcher};
//
// match fetcher.fetch(Endpoint::Summary, Some("abc123")).await {
//     FetchOutcome::Unchanged => {}
//     FetchOutcome::Fresh { payload, validator } => { /* parse */ }
//     FetchOutcome::Failed(e) => tracing::warn!("{}", e),
// }
// ```

use async_trait::async_trait;
use std::fmt;

/// The two status page endpoints that are polled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Component statuses
    Summary,
    /// Incidents and their updates
    Incidents,
}

impl Endpoint {
    /// Path relative to the status page base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Summary => "/api/v2/summary.json",
            Endpoint::Incidents => "/api/v2/incidents.json",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of one conditional fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 304: the stored validator still matches
    Unchanged,

    /// HTTP 200 with a decoded JSON body
    Fresh {
        payload: serde_json::Value,
        /// Validator from the response, quotes stripped. `None` if the
        /// response carried no ETag.
        validator: Option<String>,
    },

    /// Network, HTTP status or decode failure
    Failed(crate::Error),
}

/// Trait for status endpoint fetchers
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a monitor can be moved onto a
/// spawned task.
///
/// # Timeouts
///
/// Every request must be bounded. A timeout is reported as
/// `FetchOutcome::Failed(Error::Network(..))`.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetch `endpoint`, sending `validator` as `If-None-Match` when present
    async fn fetch(&self, endpoint: Endpoint, validator: Option<&str>) -> FetchOutcome;

    /// Short name used in logs
    fn fetcher_name(&self) -> &'static str;
}
