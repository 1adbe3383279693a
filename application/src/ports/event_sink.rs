//! Event sink port
//!
//! The executor writes every [`StreamEvent`] to a sink. Transports decide
//! what to do with them: forward over a channel, buffer, filter or drop.

use async_trait::async_trait;
use draftsmith_domain::StreamEvent;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

/// The receiving side went away (e.g. the client disconnected)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Event sink closed")]
pub struct SinkClosed;

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed>;
}

/// No-op sink for non-streaming callers
pub struct NoEvents;

#[async_trait]
impl EventSink for NoEvents {
    async fn send(&self, _event: StreamEvent) -> Result<(), SinkClosed> {
        Ok(())
    }
}

/// Forwards events over a bounded channel to a streaming transport
pub struct ChannelEventSink {
    sender: mpsc::Sender<StreamEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::Sender<StreamEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiver the transport reads from.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StreamEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        self.sender.send(event).await.map_err(|_| SinkClosed)
    }
}

/// Keeps every event in memory, in order
#[derive(Default)]
pub struct BufferedEventSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl BufferedEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StreamEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(StreamEvent::name).collect()
    }
}

#[async_trait]
impl EventSink for BufferedEventSink {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        match self.events.lock() {
            Ok(mut events) => {
                events.push(event);
                Ok(())
            }
            Err(_) => Err(SinkClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_reports_closed_receiver() {
        let (sink, receiver) = ChannelEventSink::channel(4);
        sink.send(StreamEvent::planning()).await.unwrap();
        drop(receiver);
        assert_eq!(sink.send(StreamEvent::planning()).await, Err(SinkClosed));
    }

    #[tokio::test]
    async fn test_buffered_sink_keeps_order() {
        let sink = BufferedEventSink::new();
        sink.send(StreamEvent::planning()).await.unwrap();
        sink.send(StreamEvent::Chunk { text: "a".into() }).await.unwrap();
        assert_eq!(sink.names(), vec!["status", "chunk"]);
    }
}
