//! Event records
//!
//! [`StatusEvent`] is what sinks receive: one record per detected change,
//! stamped with the time it was detected. [`MonitorEvent`] reports the
//! monitor's own lifecycle on a side channel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::config::ProductTagConfig;
use crate::detector::{ChangeKind, ComponentChange, IncidentChange};
use crate::model::ComponentSignature;
use crate::tags::derive_product_tags;
use crate::traits::Endpoint;

/// Whether a component is reported for the first time or has changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentEventKind {
    Initial,
    Changed,
}

/// A change record delivered to sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    /// A component was seen for the first time or its signature changed
    Component {
        timestamp: DateTime<Utc>,
        component_id: String,
        component_name: String,
        status: String,
        kind: ComponentEventKind,
        /// Remembered signature before the change (`Changed` only)
        previous: Option<ComponentSignature>,
    },

    /// A new incident update was posted
    Incident {
        timestamp: DateTime<Utc>,
        incident_id: String,
        incident_name: String,
        incident_impact: String,
        update_id: String,
        update_status: String,
        update_body: String,
        product_tags: Vec<String>,
    },
}

impl StatusEvent {
    pub fn from_component_change(change: ComponentChange, timestamp: DateTime<Utc>) -> Self {
        let (kind, previous) = match change.kind {
            ChangeKind::Initial => (ComponentEventKind::Initial, None),
            ChangeKind::Changed { previous } => (ComponentEventKind::Changed, Some(previous)),
        };

        StatusEvent::Component {
            timestamp,
            component_id: change.component.id,
            component_name: change.component.name,
            status: change.component.status,
            kind,
            previous,
        }
    }

    pub fn from_incident_change(
        change: IncidentChange,
        products: &ProductTagConfig,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let product_tags = derive_product_tags(
            &change.incident.name,
            &products.vocabulary,
            &products.fallback_label,
        );

        StatusEvent::Incident {
            timestamp,
            incident_id: change.incident.id,
            incident_name: change.incident.name,
            incident_impact: change.incident.impact,
            update_id: change.update.id,
            update_status: change.update.status,
            update_body: change.update.body,
            product_tags,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            StatusEvent::Component { timestamp, .. } | StatusEvent::Incident { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// Why an endpoint produced no events in a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 304 Not Modified
    NotModified,
    /// Fetch or parse failure, rendered as text
    Failed(String),
}

/// Lifecycle events emitted by the Monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Run loop started
    Started { poll_interval: Duration },

    /// An endpoint was skipped this cycle
    EndpointSkipped {
        endpoint: Endpoint,
        reason: SkipReason,
    },

    /// A cycle finished and its events were handed to the sink
    CycleCompleted {
        component_events: usize,
        incident_events: usize,
    },

    /// Run loop stopped
    Stopped { reason: String },
}
