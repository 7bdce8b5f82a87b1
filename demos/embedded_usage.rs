//! Minimal embedding example for statuswatch-core
//!
//! Drives a Monitor from an application that owns its lifecycle: a canned
//! fetcher replays a short status-page history, change events arrive on a
//! stream, and the application decides when to stop.

use async_trait::async_trait;
use serde_json::{Value, json};
use statuswatch_core::sinks::ChannelSink;
use statuswatch_core::traits::{Endpoint, FetchOutcome, StatusFetcher};
use statuswatch_core::{Monitor, MonitorConfig, Result};
use std::sync::Mutex;
use std::time::Duration;
use tokio_stream::StreamExt;

/// Replays one snapshot per cycle, then reports "not modified"
struct ReplayFetcher {
    summaries: Mutex<Vec<Value>>,
    incidents: Mutex<Vec<Value>>,
}

impl ReplayFetcher {
    fn new(mut summaries: Vec<Value>, mut incidents: Vec<Value>) -> Self {
        // Popped from the back
        summaries.reverse();
        incidents.reverse();
        Self {
            summaries: Mutex::new(summaries),
            incidents: Mutex::new(incidents),
        }
    }
}

#[async_trait]
impl StatusFetcher for ReplayFetcher {
    async fn fetch(&self, endpoint: Endpoint, _validator: Option<&str>) -> FetchOutcome {
        let queue = match endpoint {
            Endpoint::Summary => &self.summaries,
            Endpoint::Incidents => &self.incidents,
        };
        let next = queue.lock().ok().and_then(|mut q| q.pop());

        match next {
            Some(payload) => FetchOutcome::Fresh {
                payload,
                validator: None,
            },
            None => FetchOutcome::Unchanged,
        }
    }

    fn fetcher_name(&self) -> &'static str {
        "replay"
    }
}

fn component(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "updated_at": "2024-05-01T10:00:00Z",
        "position": 1
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    println!("=== Embedded statuswatch-core Example ===\n");

    let summaries = vec![
        json!({"components": [component("c1", "API", "operational"), component("c2", "Sora", "operational")]}),
        json!({"components": [component("c1", "API", "operational"), component("c2", "Sora", "partial_outage")]}),
    ];
    let incidents = vec![
        json!({"incidents": []}),
        json!({"incidents": [{
            "id": "i1",
            "name": "Elevated errors on Sora",
            "status": "investigating",
            "created_at": "2024-05-01T10:05:00Z",
            "updated_at": "2024-05-01T10:05:00Z",
            "impact": "minor",
            "incident_updates": [{
                "id": "u1",
                "incident_id": "i1",
                "status": "investigating",
                "body": "We are investigating elevated error rates.",
                "created_at": "2024-05-01T10:05:00Z",
                "display_at": "2024-05-01T10:05:00Z"
            }]
        }]}),
    ];

    let fetcher = ReplayFetcher::new(summaries, incidents);
    let (sink, mut events) = ChannelSink::new();
    let config = MonitorConfig::new().with_poll_interval_secs(1);

    println!("1. Creating monitor...");
    let (mut monitor, mut lifecycle_rx) = Monitor::new(Box::new(fetcher), Box::new(sink), config)?;

    let lifecycle_listener = tokio::spawn(async move {
        while let Some(event) = lifecycle_rx.recv().await {
            println!("[Lifecycle] {:?}", event);
        }
    });

    let change_listener = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            println!("[Change] {:?}", event);
        }
    });

    println!("2. Running monitor in background...");
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let monitor_handle = tokio::spawn(async move {
        let result = monitor.run_with_shutdown(shutdown_rx).await;
        (monitor, result)
    });

    // Three cycles: two snapshots, then a quiet one
    tokio::time::sleep(Duration::from_millis(2500)).await;

    println!("\n3. Requesting shutdown...");
    let _ = shutdown_tx.send(());

    let (monitor, result) = match monitor_handle.await {
        Ok(joined) => joined,
        Err(e) => {
            eprintln!("Monitor task failed: {}", e);
            return Ok(());
        }
    };
    result?;

    println!(
        "4. Monitor stopped: {} component(s) tracked, {} update(s) seen",
        monitor.detector().tracked_components(),
        monitor.detector().seen_update_count()
    );

    // Dropping the monitor closes both channels
    drop(monitor);
    let _ = lifecycle_listener.await;
    let _ = change_listener.await;

    println!("\n=== Embedding Successful ===");
    Ok(())
}
