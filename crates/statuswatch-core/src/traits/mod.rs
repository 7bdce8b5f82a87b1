//! Core traits for the status monitor
//!
//! - [`StatusFetcher`]: Retrieve a status endpoint with conditional requests
//! - [`EventSink`]: Receive detected change events

pub mod fetcher;
pub mod sink;

pub use fetcher::{Endpoint, FetchOutcome, StatusFetcher};
pub use sink::EventSink;
