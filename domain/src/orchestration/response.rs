//! Caller-facing response shape

use super::plan::RequestType;
use super::result::{AgentWarning, ExecutionResult};
use super::usage::UsageSummary;
use crate::agent::role::AgentRole;
use crate::content::entities::UsedContent;
use serde::Serialize;
use std::collections::BTreeMap;

/// Generated document, keyed by request type.
///
/// The body is `null` when the terminal writer did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Answer {
        answer_md: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Draft {
        draft_md: Option<String>,
        title: Option<String>,
    },
}

impl ResponseBody {
    pub fn markdown(&self) -> Option<&str> {
        match self {
            ResponseBody::Answer { answer_md, .. } => answer_md.as_deref(),
            ResponseBody::Draft { draft_md, .. } => draft_md.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ResponseBody::Answer { title, .. } | ResponseBody::Draft { title, .. } => {
                title.as_deref()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentWtu {
    pub wtu: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_wtu: u64,
    pub agents: BTreeMap<AgentRole, AgentWtu>,
}

impl From<&UsageSummary> for ResponseUsage {
    fn from(summary: &UsageSummary) -> Self {
        Self {
            input_tokens: summary.total_input_tokens(),
            output_tokens: summary.total_output_tokens(),
            total_wtu: summary.total_cost_units(),
            agents: summary
                .per_agent()
                .iter()
                .map(|(role, usage)| (*role, AgentWtu { wtu: usage.cost_units }))
                .collect(),
        }
    }
}

/// Response returned by the orchestrator and carried in the `done` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestrationResponse {
    #[serde(flatten)]
    pub body: ResponseBody,
    pub used_contents: Vec<UsedContent>,
    pub usage: ResponseUsage,
    pub warnings: Vec<AgentWarning>,
}

impl From<&ExecutionResult> for OrchestrationResponse {
    fn from(result: &ExecutionResult) -> Self {
        let markdown = result.final_output.as_ref().map(|f| f.body.clone());
        let title = result.final_output.as_ref().map(|f| f.title.clone());
        let body = match result.request_type {
            RequestType::Ask => ResponseBody::Answer {
                answer_md: markdown,
                title,
            },
            RequestType::Draft => ResponseBody::Draft {
                draft_md: markdown,
                title,
            },
        };

        Self {
            body,
            used_contents: result.used_contents.clone(),
            usage: ResponseUsage::from(&result.usage),
            warnings: result.warnings.clone(),
        }
    }
}
