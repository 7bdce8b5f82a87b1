// # Log Sink
//
// Writes each event as a structured `tracing` event at INFO level. Whatever
// subscriber the host application installed decides where it ends up.

use async_trait::async_trait;
use tracing::info;

use crate::Error;
use crate::events::StatusEvent;
use crate::traits::EventSink;

/// Event sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn emit(&self, event: &StatusEvent) -> Result<(), Error> {
        match event {
            StatusEvent::Component {
                component_name,
                status,
                kind,
                previous,
                ..
            } => {
                let previous = previous.as_ref().map(ToString::to_string).unwrap_or_default();
                info!(
                    component = %component_name,
                    status = %status,
                    kind = ?kind,
                    previous = %previous,
                    "Component status"
                );
            }
            StatusEvent::Incident {
                incident_name,
                incident_impact,
                update_status,
                update_body,
                product_tags,
                ..
            } => {
                info!(
                    incident = %incident_name,
                    impact = %incident_impact,
                    status = %update_status,
                    products = %product_tags.join(", "),
                    "Incident update: {}",
                    update_body
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn log_sink_accepts_every_event_kind() {
        let sink = LogSink;
        let incident = StatusEvent::Incident {
            timestamp: Utc::now(),
            incident_id: "i1".to_string(),
            incident_name: "Login failures".to_string(),
            incident_impact: "major".to_string(),
            update_id: "u1".to_string(),
            update_status: "identified".to_string(),
            update_body: String::new(),
            product_tags: vec!["Login".to_string()],
        };

        assert!(tokio_test::block_on(sink.emit(&incident)).is_ok());
        assert!(tokio_test::block_on(sink.flush()).is_ok());
    }
}
