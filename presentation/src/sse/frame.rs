use draftsmith_domain::{OrchestrationResponse, StreamEvent};
use serde_json::{Value, json};

/// One `event:`/`data:` pair
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: &'static str,
    pub data: Value,
}

impl SseFrame {
    pub fn from_event(event: &StreamEvent) -> Self {
        let data = match event {
            StreamEvent::Done(result) => json!({
                "success": true,
                "data": OrchestrationResponse::from(&**result),
            }),
            StreamEvent::Error { message, detail } => json!({
                "message": message,
                "detail": detail,
            }),
            other => serde_json::to_value(other)
                .ok()
                .and_then(|mut value| value.get_mut("data").map(Value::take))
                .unwrap_or(Value::Null),
        };
        Self {
            event: event.name(),
            data,
        }
    }
}

impl std::fmt::Display for SseFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event: {}\ndata: {}\n\n", self.event, self.data)
    }
}

/// Encode an event as an SSE frame: `event: <tag>\ndata: <json>\n\n`.
pub fn encode(event: &StreamEvent) -> String {
    SseFrame::from_event(event).to_string()
}
