//! Typed records decoded from the status page feeds
//!
//! Field names follow the wire format (`snake_case`), so the same structs are
//! used for decoding and for handing records to sinks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one monitored component (a product or service)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub id: String,
    pub name: String,
    /// e.g. `operational`, `degraded_performance`, `major_outage`
    pub status: String,
    pub updated_at: String,
    pub position: i64,
}

impl ComponentStatus {
    /// The fields whose change counts as a status change
    pub fn signature(&self) -> ComponentSignature {
        ComponentSignature {
            name: self.name.clone(),
            status: self.status.clone(),
        }
    }
}

/// One posted update on an incident. Immutable once published upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUpdate {
    pub id: String,
    pub body: String,
    pub created_at: String,
    pub display_at: String,
    /// e.g. `investigating`, `identified`, `monitoring`, `resolved`
    pub status: String,
    pub incident_id: String,
}

/// An incident together with its updates, in feed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub name: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
    /// e.g. `none`, `minor`, `major`, `critical`
    pub impact: String,
    #[serde(rename = "incident_updates", default)]
    pub updates: Vec<IncidentUpdate>,
}

/// `(name, status)` pair remembered per component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentSignature {
    pub name: String,
    pub status: String,
}

impl fmt::Display for ComponentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.status)
    }
}
