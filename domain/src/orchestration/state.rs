//! Plan execution state machine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle of one plan execution.
///
/// `Pending → Running(1) → … → Running(n) → Completed`, or
/// `Running(i) → Failed` on an infrastructure error. Agent failures never
/// move a plan to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanState {
    Pending,
    Running { stage_index: usize },
    Completed,
    Failed { reason: String },
}

impl PlanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanState::Completed | PlanState::Failed { .. })
    }

    /// Enter `stage_index`: from `Pending` into stage 1, or from the
    /// immediately preceding stage.
    pub fn enter_stage(&self, stage_index: usize) -> Result<PlanState, DomainError> {
        let allowed = match self {
            PlanState::Pending => stage_index == 1,
            PlanState::Running { stage_index: current } => stage_index == current + 1,
            _ => false,
        };
        if allowed {
            Ok(PlanState::Running { stage_index })
        } else {
            Err(self.illegal(format!("running({stage_index})")))
        }
    }

    /// Finish after the last stage.
    pub fn complete(&self) -> Result<PlanState, DomainError> {
        match self {
            PlanState::Running { .. } => Ok(PlanState::Completed),
            _ => Err(self.illegal("completed".to_string())),
        }
    }

    /// Abort on an infrastructure error. Allowed from any non-terminal state.
    pub fn fail(&self, reason: impl Into<String>) -> Result<PlanState, DomainError> {
        if self.is_terminal() {
            return Err(self.illegal("failed".to_string()));
        }
        Ok(PlanState::Failed {
            reason: reason.into(),
        })
    }

    fn illegal(&self, to: String) -> DomainError {
        DomainError::IllegalTransition {
            from: self.to_string(),
            to,
        }
    }
}

impl std::fmt::Display for PlanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanState::Pending => write!(f, "pending"),
            PlanState::Running { stage_index } => write!(f, "running({stage_index})"),
            PlanState::Completed => write!(f, "completed"),
            PlanState::Failed { .. } => write!(f, "failed"),
        }
    }
}
