use super::frame::encode;
use draftsmith_domain::StreamEvent;
use futures::Stream;
use tokio::sync::mpsc;

/// Which events a caller receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    /// status, chunk, done and error only
    #[default]
    Compact,
    /// Every event, including plan and per-agent events
    Verbose,
}

impl EventFilter {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            EventFilter::Verbose
        } else {
            EventFilter::Compact
        }
    }

    pub fn admits(&self, event: &StreamEvent) -> bool {
        match self {
            EventFilter::Verbose => true,
            EventFilter::Compact => !event.is_verbose_only(),
        }
    }
}

/// SSE frames for the events on `receiver`, in arrival order.
///
/// The stream ends after the first terminal (`done` or `error`) frame, or
/// when every sender is dropped.
pub fn sse_stream(
    receiver: mpsc::Receiver<StreamEvent>,
    filter: EventFilter,
) -> impl Stream<Item = String> {
    futures::stream::unfold(Some(receiver), move |state| async move {
        let mut receiver = state?;
        loop {
            let event = receiver.recv().await?;
            if !filter.admits(&event) {
                continue;
            }
            let frame = encode(&event);
            let next = if event.is_terminal() { None } else { Some(receiver) };
            return Some((frame, next));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_domain::{AgentRole, StatusLabel};
    use futures::StreamExt;

    fn agent_start() -> StreamEvent {
        StreamEvent::AgentStart {
            agent: AgentRole::Writer,
            stage: 1,
            reason: "write".to_string(),
        }
    }

    async fn collect(events: Vec<StreamEvent>, filter: EventFilter) -> Vec<String> {
        let (sender, receiver) = mpsc::channel(16);
        for event in events {
            sender.send(event).await.unwrap();
        }
        drop(sender);
        sse_stream(receiver, filter).collect().await
    }

    fn event_names(frames: &[String]) -> Vec<&str> {
        frames
            .iter()
            .filter_map(|frame| frame.lines().next())
            .filter_map(|line| line.strip_prefix("event: "))
            .collect()
    }

    #[tokio::test]
    async fn test_compact_filter_hides_agent_events() {
        let frames = collect(
            vec![
                StreamEvent::stage_status(StatusLabel::Writing, 1, 1),
                agent_start(),
                StreamEvent::Chunk {
                    text: "Hi".to_string(),
                },
                StreamEvent::error("boom", None),
            ],
            EventFilter::Compact,
        )
        .await;
        assert_eq!(event_names(&frames), vec!["status", "chunk", "error"]);
    }

    #[tokio::test]
    async fn test_verbose_filter_keeps_everything() {
        let frames = collect(
            vec![agent_start(), StreamEvent::error("boom", None)],
            EventFilter::from_verbose(true),
        )
        .await;
        assert_eq!(event_names(&frames), vec!["agent_start", "error"]);
    }

    #[tokio::test]
    async fn test_stream_stops_after_terminal_event() {
        let frames = collect(
            vec![
                StreamEvent::error("first", None),
                StreamEvent::Chunk {
                    text: "late".to_string(),
                },
            ],
            EventFilter::Verbose,
        )
        .await;
        assert_eq!(event_names(&frames), vec!["error"]);
    }

    #[tokio::test]
    async fn test_stream_ends_when_senders_drop() {
        let frames = collect(vec![agent_start()], EventFilter::Compact).await;
        assert!(frames.is_empty());
    }
}
