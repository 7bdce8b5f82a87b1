// # Channel Sink
//
// Forwards every event into an unbounded channel and hands the receiving end
// out as a stream.
//
// ## When to Use
//
// - Embedding the monitor in a larger application that consumes events
//   asynchronously
// - Tests that need to assert on the exact event sequence
//
// The channel is unbounded so `emit` never waits on a slow consumer; ordering
// is the order of `emit` calls.

use async_trait::async_trait;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::Error;
use crate::events::StatusEvent;
use crate::traits::EventSink;

/// Stream of events produced by a [`ChannelSink`]
pub type EventStream = Pin<Box<dyn Stream<Item = StatusEvent> + Send + 'static>>;

/// Event sink backed by an unbounded channel
///
/// # Example
///
/// ```rust,no_run
/// use statuswatch_core::sinks::ChannelSink;
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() {
///     let (sink, mut events) = ChannelSink::new();
///     // hand `sink` to a Monitor, then:
///     while let Some(event) = events.next().await {
///         println!("{:?}", event);
///     }
///     drop(sink);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelSink {
    /// Create a sink and the stream that yields its events
    pub fn new() -> (Self, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, Box::pin(UnboundedReceiverStream::new(rx)))
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: &StatusEvent) -> Result<(), Error> {
        self.tx
            .send(event.clone())
            .map_err(|_| Error::sink("event stream receiver dropped"))
    }
}
