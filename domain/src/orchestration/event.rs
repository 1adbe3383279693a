//! Stream events emitted while a plan runs

use super::plan::ExecutionPlan;
use super::result::{AgentStatus, ExecutionResult};
use crate::agent::role::AgentRole;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Coarse phase shown to every caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Planning,
    Processing,
    Writing,
}

impl StatusLabel {
    /// Label of a stage: `writing` when it holds the terminal writer.
    pub fn for_stage(has_terminal_agent: bool) -> Self {
        if has_terminal_agent {
            StatusLabel::Writing
        } else {
            StatusLabel::Processing
        }
    }
}

/// `floor(100 * (stage_index - 1) / total_stages)`
pub fn progress_percent(stage_index: usize, total_stages: usize) -> u8 {
    if total_stages == 0 {
        return 0;
    }
    let done = stage_index.saturating_sub(1).min(total_stages);
    (done * 100 / total_stages) as u8
}

/// One entry of the ordered event stream.
///
/// Serialized adjacently tagged: `{"event": "agent_done", "data": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    Plan(ExecutionPlan),
    Status {
        label: StatusLabel,
        progress: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_stages: Option<usize>,
    },
    AgentStart {
        agent: AgentRole,
        stage: usize,
        reason: String,
    },
    AgentChunk {
        agent: AgentRole,
        stage: usize,
        text: String,
    },
    AgentDone {
        agent: AgentRole,
        stage: usize,
        model_used: Option<Model>,
        input_tokens: u64,
        output_tokens: u64,
        cost_units: u64,
    },
    AgentError {
        agent: AgentRole,
        stage: usize,
        status: AgentStatus,
        message: String,
    },
    /// Fragment of the final body
    Chunk { text: String },
    Done(Box<ExecutionResult>),
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl StreamEvent {
    pub fn planning() -> Self {
        StreamEvent::Status {
            label: StatusLabel::Planning,
            progress: 0,
            stage: None,
            total_stages: None,
        }
    }

    pub fn stage_status(label: StatusLabel, stage: usize, total_stages: usize) -> Self {
        StreamEvent::Status {
            label,
            progress: progress_percent(stage, total_stages),
            stage: Some(stage),
            total_stages: Some(total_stages),
        }
    }

    pub fn error(message: impl Into<String>, detail: Option<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
            detail,
        }
    }

    /// Wire tag of the event
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::Plan(_) => "plan",
            StreamEvent::Status { .. } => "status",
            StreamEvent::AgentStart { .. } => "agent_start",
            StreamEvent::AgentChunk { .. } => "agent_chunk",
            StreamEvent::AgentDone { .. } => "agent_done",
            StreamEvent::AgentError { .. } => "agent_error",
            StreamEvent::Chunk { .. } => "chunk",
            StreamEvent::Done(_) => "done",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Events hidden from callers that did not ask for verbose streaming
    pub fn is_verbose_only(&self) -> bool {
        !matches!(
            self,
            StreamEvent::Status { .. }
                | StreamEvent::Chunk { .. }
                | StreamEvent::Done(_)
                | StreamEvent::Error { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done(_) | StreamEvent::Error { .. })
    }

    /// Stage the event belongs to, for per-stage events
    pub fn stage(&self) -> Option<usize> {
        match self {
            StreamEvent::AgentStart { stage, .. }
            | StreamEvent::AgentChunk { stage, .. }
            | StreamEvent::AgentDone { stage, .. }
            | StreamEvent::AgentError { stage, .. } => Some(*stage),
            StreamEvent::Status { stage, .. } => *stage,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_floored() {
        assert_eq!(progress_percent(1, 3), 0);
        assert_eq!(progress_percent(2, 3), 33);
        assert_eq!(progress_percent(3, 3), 66);
        assert_eq!(progress_percent(2, 2), 50);
        assert_eq!(progress_percent(1, 0), 0);
    }

    #[test]
    fn test_verbose_only_set() {
        assert!(!StreamEvent::planning().is_verbose_only());
        assert!(!StreamEvent::Chunk { text: "x".into() }.is_verbose_only());
        assert!(!StreamEvent::error("boom", None).is_verbose_only());
        let start = StreamEvent::AgentStart {
            agent: AgentRole::Writer,
            stage: 1,
            reason: String::new(),
        };
        assert!(start.is_verbose_only());
        assert_eq!(start.name(), "agent_start");
    }

    #[test]
    fn test_adjacent_tagging() {
        let event = StreamEvent::stage_status(StatusLabel::Writing, 2, 2);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "status");
        assert_eq!(json["data"]["label"], "writing");
        assert_eq!(json["data"]["progress"], 50);
        assert_eq!(json["data"]["stage"], 2);
    }
}
