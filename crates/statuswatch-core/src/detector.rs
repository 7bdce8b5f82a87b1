//! Change detection
//!
//! The [`ChangeDetector`] remembers what it has already reported and turns a
//! fresh set of records into the changes worth announcing:
//!
//! - **Components**: keyed by id, compared on their `(name, status)`
//!   signature. The first sighting is reported as [`ChangeKind::Initial`], a
//!   differing signature as [`ChangeKind::Changed`].
//! - **Incidents**: every incident update id is reported exactly once for the
//!   lifetime of the detector. Update ids are immutable upstream, so a seen id
//!   carries no new information.
//!
//! Components that vanish from a payload are not reported; their last
//! signature simply stays in memory.

use std::collections::{HashMap, HashSet};

use crate::model::{ComponentSignature, ComponentStatus, Incident, IncidentUpdate};

/// How a component changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// First time this component id was observed
    Initial,
    /// The signature differs from the remembered one
    Changed {
        previous: ComponentSignature,
    },
}

/// A component whose status should be announced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentChange {
    pub component: ComponentStatus,
    pub kind: ChangeKind,
}

/// An incident update not seen before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentChange {
    pub incident: Incident,
    pub update: IncidentUpdate,
}

/// In-memory change detector
///
/// Memory only ever grows: component ids are never forgotten and update ids
/// are never removed from the seen-set.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    /// Last seen signature per component id
    components: HashMap<String, ComponentSignature>,

    /// Incident update ids already reported
    seen_updates: HashSet<String>,
}

impl ChangeDetector {
    /// Create a detector with empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare components against memory, in input order
    pub fn observe_components(&mut self, components: &[ComponentStatus]) -> Vec<ComponentChange> {
        let mut changes = Vec::new();

        for component in components {
            let signature = component.signature();

            let kind = match self.components.get(&component.id) {
                None => ChangeKind::Initial,
                Some(previous) if *previous != signature => ChangeKind::Changed {
                    previous: previous.clone(),
                },
                Some(_) => continue,
            };

            self.components.insert(component.id.clone(), signature);
            changes.push(ComponentChange {
                component: component.clone(),
                kind,
            });
        }

        changes
    }

    /// Report incident updates not seen before, in incident then update order
    pub fn observe_incidents(&mut self, incidents: &[Incident]) -> Vec<IncidentChange> {
        let mut changes = Vec::new();

        for incident in incidents {
            for update in &incident.updates {
                if self.seen_updates.insert(update.id.clone()) {
                    changes.push(IncidentChange {
                        incident: incident.clone(),
                        update: update.clone(),
                    });
                }
            }
        }

        changes
    }

    /// Number of component ids in memory
    pub fn tracked_components(&self) -> usize {
        self.components.len()
    }

    /// Number of incident update ids already reported
    pub fn seen_update_count(&self) -> usize {
        self.seen_updates.len()
    }

    /// Remembered signature for a component id
    pub fn component_signature(&self, id: &str) -> Option<&ComponentSignature> {
        self.components.get(id)
    }

    /// Whether an update id has already been reported
    pub fn has_seen_update(&self, id: &str) -> bool {
        self.seen_updates.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str, name: &str, status: &str) -> ComponentStatus {
        ComponentStatus {
            id: id.to_string(),
            name: name.to_string(),
            status: status.to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            position: 1,
        }
    }

    fn update(id: &str, incident_id: &str) -> IncidentUpdate {
        IncidentUpdate {
            id: id.to_string(),
            body: format!("update {id}"),
            created_at: "t".to_string(),
            display_at: "t".to_string(),
            status: "investigating".to_string(),
            incident_id: incident_id.to_string(),
        }
    }

    fn incident(id: &str, update_ids: &[&str]) -> Incident {
        Incident {
            id: id.to_string(),
            name: format!("Incident {id}"),
            status: "investigating".to_string(),
            created_at: "t".to_string(),
            updated_at: "t".to_string(),
            resolved_at: None,
            impact: "minor".to_string(),
            updates: update_ids.iter().map(|u| update(u, id)).collect(),
        }
    }

    #[test]
    fn identical_components_are_reported_once() {
        let mut detector = ChangeDetector::new();
        let payload = vec![component("a", "API", "operational"), component("b", "Batch", "operational")];

        let first = detector.observe_components(&payload);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|c| c.kind == ChangeKind::Initial));

        assert!(detector.observe_components(&payload).is_empty());
        assert_eq!(detector.tracked_components(), 2);
    }

    #[test]
    fn changes_follow_input_order() {
        let mut detector = ChangeDetector::new();
        detector.observe_components(&[
            component("a", "API", "operational"),
            component("b", "Batch", "operational"),
        ]);

        let changes = detector.observe_components(&[
            component("a", "API", "operational"),
            component("b", "Batch", "partial_outage"),
            component("c", "Codex", "operational"),
        ]);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].component.id, "b");
        assert_eq!(
            changes[0].kind,
            ChangeKind::Changed {
                previous: ComponentSignature {
                    name: "Batch".to_string(),
                    status: "operational".to_string(),
                }
            }
        );
        assert_eq!(changes[1].component.id, "c");
        assert_eq!(changes[1].kind, ChangeKind::Initial);
    }

    #[test]
    fn rename_counts_as_change() {
        let mut detector = ChangeDetector::new();
        detector.observe_components(&[component("a", "API", "operational")]);

        let changes = detector.observe_components(&[component("a", "Public API", "operational")]);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            detector.component_signature("a").map(ToString::to_string),
            Some("Public API:operational".to_string())
        );
    }

    #[test]
    fn disappeared_component_is_silent() {
        let mut detector = ChangeDetector::new();
        detector.observe_components(&[
            component("a", "API", "operational"),
            component("b", "Batch", "operational"),
        ]);

        assert!(detector.observe_components(&[component("a", "API", "operational")]).is_empty());
        assert!(detector.component_signature("b").is_some());

        // Coming back unchanged is not news either
        assert!(detector.observe_components(&[component("b", "Batch", "operational")]).is_empty());
    }

    #[test]
    fn updated_at_alone_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        detector.observe_components(&[component("a", "API", "operational")]);

        let mut touched = component("a", "API", "operational");
        touched.updated_at = "2024-06-01T00:00:00Z".to_string();
        touched.position = 7;
        assert!(detector.observe_components(&[touched]).is_empty());
    }

    #[test]
    fn incident_updates_are_deduplicated() {
        let mut detector = ChangeDetector::new();
        let feed = vec![incident("i1", &["u1", "u2"])];

        let first = detector.observe_incidents(&feed);
        let ids: Vec<&str> = first.iter().map(|c| c.update.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2"]);

        assert!(detector.observe_incidents(&feed).is_empty());

        let grown = vec![incident("i1", &["u3", "u2", "u1"])];
        let next = detector.observe_incidents(&grown);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].update.id, "u3");
        assert_eq!(next[0].incident.id, "i1");
        assert_eq!(detector.seen_update_count(), 3);
    }

    #[test]
    fn incidents_then_updates_order() {
        let mut detector = ChangeDetector::new();
        let changes = detector.observe_incidents(&[
            incident("i2", &["u4", "u3"]),
            incident("i1", &["u1"]),
        ]);

        let order: Vec<(&str, &str)> = changes
            .iter()
            .map(|c| (c.incident.id.as_str(), c.update.id.as_str()))
            .collect();
        assert_eq!(order, vec![("i2", "u4"), ("i2", "u3"), ("i1", "u1")]);
    }

    #[test]
    fn duplicate_update_id_within_one_feed_reported_once() {
        let mut detector = ChangeDetector::new();
        let changes = detector.observe_incidents(&[incident("i1", &["u1", "u1"])]);
        assert_eq!(changes.len(), 1);
        assert!(detector.has_seen_update("u1"));
    }
}
