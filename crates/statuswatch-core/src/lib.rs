// # statuswatch-core
//
// Core library for status page change detection.
//
// ## Architecture Overview
//
// This library polls a status page's summary and incidents endpoints and
// reports each meaningful change exactly once:
// - **StatusFetcher**: Trait for conditional GETs against one endpoint
// - **parser**: Raw JSON to typed component / incident records
// - **ChangeDetector**: Component signatures and the incident-update seen-set
// - **Monitor**: Orchestrates fetch → parse → detect → emit, once or in a loop
// - **EventSink**: Trait for whatever consumes the change events
//
// ## Design Principles
//
// 1. **Library-First**: The daemon is a thin wrapper; everything lives here
// 2. **Failures are values**: A bad endpoint never stops the other one
// 3. **Exactly once per process**: Update ids are never re-announced
// 4. **Memory only**: Nothing is persisted; a restart re-announces current state

pub mod config;
pub mod detector;
pub mod error;
pub mod events;
pub mod model;
pub mod monitor;
pub mod parser;
pub mod sinks;
pub mod tags;
pub mod traits;

// Re-export core types for convenience
pub use config::{MonitorConfig, ProductTagConfig};
pub use detector::{ChangeDetector, ChangeKind, ComponentChange, IncidentChange};
pub use error::{Error, Result};
pub use events::{ComponentEventKind, MonitorEvent, SkipReason, StatusEvent};
pub use model::{ComponentSignature, ComponentStatus, Incident, IncidentUpdate};
pub use monitor::{CycleReport, EndpointOutcome, Monitor, MonitorState};
pub use sinks::{ChannelSink, LogSink};
pub use traits::{Endpoint, EventSink, FetchOutcome, StatusFetcher};
