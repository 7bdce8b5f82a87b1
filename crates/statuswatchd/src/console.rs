// # Console Sink
//
// Prints change events to stdout in the human-readable format:
//
// ```text
// [2024-05-01 10:00:00] Product: API Status: operational ✅ (Initial Status)
// [2024-05-01 10:05:00] Product: API Status: partial_outage 🟡 (Status changed from API:operational)
// [2024-05-01 10:06:00] Product: Sora Status: investigating 🔍 🟡
//     Incident: Sora errors
//     Update: We are investigating elevated error rates.
//     Impact: minor
//
// ```

use async_trait::async_trait;
use statuswatch_core::events::{ComponentEventKind, StatusEvent};
use statuswatch_core::traits::EventSink;
use statuswatch_core::Error;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Event sink that writes to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for ConsoleSink {
    async fn emit(&self, event: &StatusEvent) -> Result<(), Error> {
        let text = render(event);
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| Error::sink(format!("Failed to write to stdout: {}", e)))
    }

    async fn flush(&self) -> Result<(), Error> {
        std::io::stdout()
            .flush()
            .map_err(|e| Error::sink(format!("Failed to flush stdout: {}", e)))
    }
}

/// Render one event, including its trailing newline(s)
pub fn render(event: &StatusEvent) -> String {
    let timestamp = event.timestamp().format(TIMESTAMP_FORMAT);

    match event {
        StatusEvent::Component {
            component_name,
            status,
            kind,
            previous,
            ..
        } => {
            let label = match (kind, previous) {
                (ComponentEventKind::Changed, Some(previous)) => {
                    format!("Status changed from {}", previous)
                }
                _ => "Initial Status".to_string(),
            };
            format!(
                "[{}] Product: {} Status: {} {} ({})\n",
                timestamp,
                component_name,
                status,
                status_emoji(status),
                label
            )
        }
        StatusEvent::Incident {
            incident_name,
            incident_impact,
            update_status,
            update_body,
            product_tags,
            ..
        } => {
            let headline = format!(
                "[{}] Product: {} Status: {} {} {}",
                timestamp,
                product_tags.join(", "),
                update_status,
                status_emoji(update_status),
                impact_emoji(incident_impact)
            );

            let mut text = format!("{}\n    Incident: {}\n", headline.trim_end(), incident_name);
            if !update_body.is_empty() {
                text.push_str(&format!("    Update: {}\n", update_body));
            }
            text.push_str(&format!("    Impact: {}\n\n", incident_impact));
            text
        }
    }
}

/// Marker for a component status or an incident update status
pub fn status_emoji(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "operational" | "resolved" => "✅",
        "degraded_performance" => "⚠️",
        "partial_outage" => "🟡",
        "major_outage" => "🔴",
        "under_maintenance" => "🔧",
        "investigating" => "🔍",
        "identified" => "📝",
        "monitoring" => "👁️",
        _ => "📋",
    }
}

/// Marker for an incident impact level; empty for `none` and unknown levels
pub fn impact_emoji(impact: &str) -> &'static str {
    match impact.to_lowercase().as_str() {
        "minor" => "🟡",
        "major" => "🔴",
        "critical" => "🚨",
        _ => "",
    }
}
