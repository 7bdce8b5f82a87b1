// # Event Sink Trait
//
// Defines where change events go once the detector has produced them.
//
// Sinks are the monitor's only output for changes: console printers, log
// shippers, alerting bridges. The monitor awaits each `emit` in cycle order,
// so a sink sees events exactly in the order they were detected.

use async_trait::async_trait;

use crate::events::StatusEvent;

/// Trait for event sinks
///
/// # Failure
///
/// An `Err` from `emit` is logged by the monitor. Detector memory is not rolled
/// back, so the event is not offered again on the next cycle.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event
    async fn emit(&self, event: &StatusEvent) -> Result<(), crate::Error>;

    /// Flush anything buffered. Called once when the run loop stops.
    async fn flush(&self) -> Result<(), crate::Error> {
        Ok(())
    }
}
