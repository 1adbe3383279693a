//! Server-sent events transport
//!
//! Turns the executor's event channel into `text/event-stream` frames.
//! Filtering of per-agent events happens here, never in the executor.

mod frame;
mod stream;

pub use frame::{SseFrame, encode};
pub use stream::{EventFilter, sse_stream};
