//! Status monitor
//!
//! The Monitor is responsible for:
//! - Fetching both status endpoints with conditional requests
//! - Keeping one cache validator per endpoint
//! - Feeding fresh payloads through the parser and the change detector
//! - Handing change events to the sink, in detection order
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ StatusFetcher │─── FetchOutcome ───┐
//! └───────────────┘                    │
//!                                      ▼
//!                              ┌──────────────┐
//!                              │   Monitor    │
//!                              └──────────────┘
//!                                      │
//!         ┌────────────────────────────┼────────────────────────────┐
//!         │                            │                            │
//!         ▼                            ▼                            ▼
//! ┌───────────────┐          ┌────────────────┐          ┌───────────────┐
//! │    Parser     │          │ ChangeDetector │          │   EventSink   │
//! │  (records)    │          │  (diff/dedup)  │          │   (notify)    │
//! └───────────────┘          └────────────────┘          └───────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Fetch the summary endpoint; on a fresh payload, detect component
//!    changes and emit them
//! 2. Fetch the incidents endpoint; on a fresh payload, detect new incident
//!    updates and emit them
//! 3. Report the cycle on the lifecycle channel
//!
//! A 304, a failed fetch or a malformed payload skips that endpoint only.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::{MonitorConfig, ProductTagConfig};
use crate::detector::ChangeDetector;
use crate::error::{Error, Result};
use crate::events::{MonitorEvent, SkipReason, StatusEvent};
use crate::parser::{parse_components, parse_incidents};
use crate::traits::{Endpoint, EventSink, FetchOutcome, StatusFetcher};

/// Where the monitor is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Between cycles, or not started yet
    Idle,
    /// A cycle is in progress
    Polling,
    /// The run loop has exited; terminal
    Stopped,
}

/// What happened to one endpoint during a cycle
#[derive(Debug)]
pub enum EndpointOutcome {
    /// Fresh payload parsed; `events` change events were emitted
    Processed { events: usize },
    /// 304, nothing to do
    NotModified,
    /// Fetch or parse failure
    Failed(Error),
}

impl EndpointOutcome {
    pub fn events(&self) -> usize {
        match self {
            EndpointOutcome::Processed { events } => *events,
            _ => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EndpointOutcome::Failed(_))
    }
}

/// Result of a single [`Monitor::check_once`] call
#[derive(Debug)]
pub struct CycleReport {
    pub summary: EndpointOutcome,
    pub incidents: EndpointOutcome,
}

impl CycleReport {
    pub fn component_events(&self) -> usize {
        self.summary.events()
    }

    pub fn incident_events(&self) -> usize {
        self.incidents.events()
    }

    pub fn total_events(&self) -> usize {
        self.component_events() + self.incident_events()
    }
}

/// Status page monitor
///
/// Owns the fetcher, the sink, the change detector and the per-endpoint cache
/// validators. All mutation goes through `&mut self`, so one monitor is driven
/// by exactly one task and needs no locking.
///
/// ## Lifecycle
///
/// 1. Create with [`Monitor::new()`]
/// 2. Either call [`Monitor::check_once()`] for a single pass, or
/// 3. Run with [`Monitor::run()`] / [`Monitor::run_with_shutdown()`] until cancelled
///
/// Memory is never persisted: a new monitor re-announces every component as
/// initial and every listed incident update as new.
pub struct Monitor {
    /// Fetcher for both endpoints
    fetcher: Box<dyn StatusFetcher>,

    /// Destination for change events
    sink: Box<dyn EventSink>,

    /// Component and incident-update memory
    detector: ChangeDetector,

    /// Last validator per endpoint, from the most recent usable 200 response
    validators: HashMap<Endpoint, String>,

    /// Sleep between cycles
    poll_interval: Duration,

    /// Product tagging for incident events
    products: ProductTagConfig,

    /// Current lifecycle state
    state: MonitorState,

    /// Lifecycle event sender for external monitoring
    event_tx: mpsc::Sender<MonitorEvent>,
}

impl Monitor {
    /// Create a new monitor
    ///
    /// # Parameters
    ///
    /// - `fetcher`: Status fetcher implementation
    /// - `sink`: Event sink implementation
    /// - `config`: Monitor configuration
    ///
    /// # Returns
    ///
    /// A tuple of (monitor, event_receiver) where event_receiver yields lifecycle events
    pub fn new(
        fetcher: Box<dyn StatusFetcher>,
        sink: Box<dyn EventSink>,
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<MonitorEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let monitor = Self {
            fetcher,
            sink,
            detector: ChangeDetector::new(),
            validators: HashMap::new(),
            poll_interval: config.poll_interval(),
            products: config.products,
            state: MonitorState::Idle,
            event_tx: tx,
        };

        Ok((monitor, rx))
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Read access to the detector memory
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Validator that will be sent with the next request to `endpoint`
    pub fn validator(&self, endpoint: Endpoint) -> Option<&str> {
        self.validators.get(&endpoint).map(String::as_str)
    }

    /// Run one poll cycle
    ///
    /// The summary endpoint is fully processed (fetched, diffed, emitted)
    /// before the incidents endpoint is fetched. Failures are logged and
    /// reported in the returned [`CycleReport`]; none escape.
    pub async fn check_once(&mut self) -> CycleReport {
        let previous_state = self.state;
        self.state = MonitorState::Polling;

        let summary = self.poll_endpoint(Endpoint::Summary).await;
        let incidents = self.poll_endpoint(Endpoint::Incidents).await;

        let report = CycleReport { summary, incidents };

        debug!(
            "Cycle complete: {} component event(s), {} incident event(s)",
            report.component_events(),
            report.incident_events()
        );
        self.emit_event(MonitorEvent::CycleCompleted {
            component_events: report.component_events(),
            incident_events: report.incident_events(),
        });

        self.state = match previous_state {
            MonitorState::Stopped => MonitorState::Stopped,
            _ => MonitorState::Idle,
        };

        report
    }

    /// Run until Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown_rx` fires or its sender is dropped
    pub async fn run_with_shutdown(&mut self, shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.run_until(async move {
            let _ = shutdown_rx.await;
        })
        .await
    }

    /// Run cycles until `shutdown` completes
    ///
    /// Each cycle is followed by a sleep of `poll_interval`. Cancellation is
    /// observed during the sleep and before each cycle; a cycle that has
    /// already started runs to completion, so its events are emitted and its
    /// memory updates kept. The sink is flushed on the way out.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        if self.state == MonitorState::Stopped {
            return Err(Error::Other("monitor has already stopped".to_string()));
        }

        tokio::pin!(shutdown);

        info!(
            "Starting status monitor (polling every {:?} via {})",
            self.poll_interval,
            self.fetcher.fetcher_name()
        );
        self.emit_event(MonitorEvent::Started {
            poll_interval: self.poll_interval,
        });

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = std::future::ready(()) => {}
            }

            self.check_once().await;

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("Shutdown signal received");
        self.state = MonitorState::Stopped;
        self.emit_event(MonitorEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });

        self.sink.flush().await?;
        info!("Sink flushed, monitor stopped");

        Ok(())
    }

    /// Fetch one endpoint and process a fresh payload
    async fn poll_endpoint(&mut self, endpoint: Endpoint) -> EndpointOutcome {
        let validator = self.validators.get(&endpoint).cloned();

        match self.fetcher.fetch(endpoint, validator.as_deref()).await {
            FetchOutcome::Unchanged => {
                debug!("{} not modified", endpoint);
                self.emit_event(MonitorEvent::EndpointSkipped {
                    endpoint,
                    reason: SkipReason::NotModified,
                });
                EndpointOutcome::NotModified
            }
            FetchOutcome::Failed(e) => self.skip(endpoint, e),
            FetchOutcome::Fresh {
                payload,
                validator: new_validator,
            } => {
                let events = match self.detect(endpoint, &payload) {
                    Ok(events) => events,
                    Err(e) => return self.skip(endpoint, e),
                };

                self.store_validator(endpoint, new_validator);

                let count = events.len();
                self.deliver(events).await;
                EndpointOutcome::Processed { events: count }
            }
        }
    }

    /// Parse a payload and diff it against memory
    fn detect(&mut self, endpoint: Endpoint, payload: &serde_json::Value) -> Result<Vec<StatusEvent>> {
        let now = Utc::now();

        let events = match endpoint {
            Endpoint::Summary => {
                let components = parse_components(payload)?;
                self.detector
                    .observe_components(&components)
                    .into_iter()
                    .map(|change| StatusEvent::from_component_change(change, now))
                    .collect()
            }
            Endpoint::Incidents => {
                let incidents = parse_incidents(payload)?;
                self.detector
                    .observe_incidents(&incidents)
                    .into_iter()
                    .map(|change| StatusEvent::from_incident_change(change, &self.products, now))
                    .collect()
            }
        };

        Ok(events)
    }

    /// Replace the stored validator; a response without one clears it
    fn store_validator(&mut self, endpoint: Endpoint, validator: Option<String>) {
        match validator.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.validators.insert(endpoint, v);
            }
            None => {
                if self.validators.remove(&endpoint).is_some() {
                    debug!("{} returned no validator, conditional requests disabled", endpoint);
                }
            }
        }
    }

    /// Hand events to the sink in order
    async fn deliver(&self, events: Vec<StatusEvent>) {
        for event in &events {
            if let Err(e) = self.sink.emit(event).await {
                error!("Failed to emit event: {}", e);
            }
        }
    }

    fn skip(&self, endpoint: Endpoint, e: Error) -> EndpointOutcome {
        if e.is_transient() {
            warn!("Skipping {} this cycle: {}", endpoint, e);
        } else {
            error!("Skipping {} this cycle: {}", endpoint, e);
        }
        self.emit_event(MonitorEvent::EndpointSkipped {
            endpoint,
            reason: SkipReason::Failed(e.to_string()),
        });
        EndpointOutcome::Failed(e)
    }

    /// Emit a lifecycle event
    fn emit_event(&self, event: MonitorEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Lifecycle event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
