//! Test doubles and common utilities for monitor contract tests
//!
//! This module provides minimal test doubles that script fetch outcomes and
//! record emitted events without touching the network.

#![allow(dead_code)]

use serde_json::{Value, json};
use statuswatch_core::config::MonitorConfig;
use statuswatch_core::error::{Error, Result};
use statuswatch_core::events::StatusEvent;
use statuswatch_core::traits::{Endpoint, EventSink, FetchOutcome, StatusFetcher};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A fetch result the test wants the fetcher to produce
#[derive(Debug, Clone)]
pub enum Scripted {
    NotModified,
    Fresh(Value, Option<&'static str>),
    NetworkError,
    HttpStatus(u16),
}

impl Scripted {
    fn into_outcome(self) -> FetchOutcome {
        match self {
            Scripted::NotModified => FetchOutcome::Unchanged,
            Scripted::Fresh(payload, validator) => FetchOutcome::Fresh {
                payload,
                validator: validator.map(str::to_string),
            },
            Scripted::NetworkError => FetchOutcome::Failed(Error::network("connection reset by peer")),
            Scripted::HttpStatus(status) => FetchOutcome::Failed(Error::http(status)),
        }
    }
}

/// A fetcher that replays scripted outcomes per endpoint
///
/// When an endpoint's script runs out it answers `NotModified`.
pub struct ScriptedFetcher {
    /// Queued outcomes per endpoint
    script: Arc<Mutex<HashMap<Endpoint, VecDeque<Scripted>>>>,
    /// Validators received, per endpoint, in call order
    validators_seen: Arc<Mutex<Vec<(Endpoint, Option<String>)>>>,
    /// Call counter for fetch()
    fetch_call_count: Arc<AtomicUsize>,
    /// Artificial latency per fetch
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(HashMap::new())),
            validators_seen: Arc::new(Mutex::new(Vec::new())),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Make every fetch take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue an outcome for `endpoint`
    pub fn push(&self, endpoint: Endpoint, outcome: Scripted) {
        self.script
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(outcome);
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Validators passed to fetch() for `endpoint`, in call order
    pub fn validators_for(&self, endpoint: Endpoint) -> Vec<Option<String>> {
        self.validators_seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Create a new ScriptedFetcher that shares its script and counters with an existing one
    pub fn sharing_script_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            validators_seen: Arc::clone(&other.validators_seen),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            delay: other.delay,
        }
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(&self, endpoint: Endpoint, validator: Option<&str>) -> FetchOutcome {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.validators_seen
            .lock()
            .unwrap()
            .push((endpoint, validator.map(str::to_string)));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Scripted::NotModified);

        next.into_outcome()
    }

    fn fetcher_name(&self) -> &'static str {
        "scripted"
    }
}

/// A sink that records every event it receives
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StatusEvent>>>,
    flush_call_count: Arc<AtomicUsize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            flush_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Get the number of times flush() was called
    pub fn flush_call_count(&self) -> usize {
        self.flush_call_count.load(Ordering::SeqCst)
    }

    /// Create a new RecordingSink that shares its log with an existing one
    pub fn sharing_log_with(other: &Self) -> Self {
        Self {
            events: Arc::clone(&other.events),
            flush_call_count: Arc::clone(&other.flush_call_count),
        }
    }
}

#[async_trait::async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: &StatusEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.flush_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A sink that rejects every event
pub struct FailingSink {
    emit_call_count: Arc<AtomicUsize>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self {
            emit_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn emit_call_count(&self) -> usize {
        self.emit_call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            emit_call_count: Arc::clone(&other.emit_call_count),
        }
    }
}

#[async_trait::async_trait]
impl EventSink for FailingSink {
    async fn emit(&self, _event: &StatusEvent) -> Result<()> {
        self.emit_call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::sink("downstream unavailable"))
    }
}

/// Summary payload with `(id, name, status)` components, positions in order
pub fn summary(components: &[(&str, &str, &str)]) -> Value {
    let components: Vec<Value> = components
        .iter()
        .enumerate()
        .map(|(i, (id, name, status))| {
            json!({
                "id": id,
                "name": name,
                "status": status,
                "updated_at": "2024-01-01T00:00:00.000Z",
                "position": i + 1,
                "description": null,
                "showcase": true,
            })
        })
        .collect();

    json!({
        "page": {"id": "page", "name": "Status", "url": "https://status.example.com"},
        "components": components,
        "status": {"indicator": "none", "description": "All Systems Operational"},
    })
}

/// Incidents payload with `(incident id, name, [update ids])` entries
pub fn incidents(entries: &[(&str, &str, &[&str])]) -> Value {
    let incidents: Vec<Value> = entries
        .iter()
        .map(|(id, name, update_ids)| {
            let updates: Vec<Value> = update_ids
                .iter()
                .map(|update_id| {
                    json!({
                        "id": update_id,
                        "body": format!("Update {update_id}"),
                        "created_at": "2024-01-01T00:00:00.000Z",
                        "display_at": "2024-01-01T00:00:00.000Z",
                        "status": "investigating",
                        "incident_id": id,
                        "affected_components": [],
                    })
                })
                .collect();

            json!({
                "id": id,
                "name": name,
                "status": "investigating",
                "created_at": "2024-01-01T00:00:00.000Z",
                "updated_at": "2024-01-01T00:00:00.000Z",
                "resolved_at": null,
                "impact": "minor",
                "incident_updates": updates,
            })
        })
        .collect();

    json!({ "page": {"id": "page"}, "incidents": incidents })
}

/// Helper to create a minimal MonitorConfig for testing
pub fn minimal_config() -> MonitorConfig {
    MonitorConfig::new()
        .with_base_url("http://status.test")
        .with_poll_interval_secs(1)
        .with_request_timeout_secs(1)
}

/// Component events as `(name, status, previous)` triples
pub fn component_summaries(events: &[StatusEvent]) -> Vec<(String, String, Option<String>)> {
    events
        .iter()
        .filter_map(|event| match event {
            StatusEvent::Component {
                component_name,
                status,
                previous,
                ..
            } => Some((
                component_name.clone(),
                status.clone(),
                previous.as_ref().map(ToString::to_string),
            )),
            _ => None,
        })
        .collect()
}

/// Update ids of incident events, in emission order
pub fn update_ids(events: &[StatusEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            StatusEvent::Incident { update_id, .. } => Some(update_id.clone()),
            _ => None,
        })
        .collect()
}
