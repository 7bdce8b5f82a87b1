// # Sink Implementations
//
// Built-in implementations of the EventSink trait. Console output with
// emoji and labels lives in the daemon, not here.

pub mod channel;
pub mod log;

pub use channel::{ChannelSink, EventStream};
pub use log::LogSink;
