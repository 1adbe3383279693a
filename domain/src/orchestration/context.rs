//! Orchestration context and the read-only views agents receive

use super::plan::{RequestType, RetrievalMode};
use super::result::AgentWarning;
use crate::agent::role::AgentRole;
use crate::content::entities::{Connection, SelectedContent};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request-scoped inputs that never change during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationInput {
    pub request_id: String,
    pub prompt: String,
    pub request_type: RequestType,
    pub retrieval_mode: RetrievalMode,
    pub selected_contents: Vec<SelectedContent>,
    pub connections: Vec<Connection>,
}

/// Accumulator owned by the executor for the duration of one run.
///
/// Agents never see this type; they receive a [`ContextView`] snapshot taken
/// when their stage starts.
#[derive(Debug, Clone)]
pub struct OrchestrationContext {
    input: Arc<OrchestrationInput>,
    accumulated_outputs: BTreeMap<AgentRole, String>,
    warnings: Vec<AgentWarning>,
}

impl OrchestrationContext {
    pub fn new(input: OrchestrationInput) -> Self {
        Self {
            input: Arc::new(input),
            accumulated_outputs: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn input(&self) -> &OrchestrationInput {
        &self.input
    }

    /// Merge a successful agent's content.
    pub fn merge_output(&mut self, role: AgentRole, content: String) {
        self.accumulated_outputs.insert(role, content);
    }

    pub fn push_warning(&mut self, warning: AgentWarning) {
        self.warnings.push(warning);
    }

    pub fn accumulated_outputs(&self) -> &BTreeMap<AgentRole, String> {
        &self.accumulated_outputs
    }

    pub fn warnings(&self) -> &[AgentWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<AgentWarning> {
        self.warnings
    }

    /// Immutable snapshot. Later merges do not affect views already taken.
    pub fn view(&self) -> ContextView {
        ContextView {
            input: Arc::clone(&self.input),
            accumulated_outputs: Arc::new(self.accumulated_outputs.clone()),
        }
    }
}

/// What an agent sees: the request plus every output merged so far.
#[derive(Debug, Clone)]
pub struct ContextView {
    input: Arc<OrchestrationInput>,
    accumulated_outputs: Arc<BTreeMap<AgentRole, String>>,
}

impl ContextView {
    pub fn request_id(&self) -> &str {
        &self.input.request_id
    }

    pub fn prompt(&self) -> &str {
        &self.input.prompt
    }

    pub fn request_type(&self) -> RequestType {
        self.input.request_type
    }

    pub fn retrieval_mode(&self) -> RetrievalMode {
        self.input.retrieval_mode
    }

    pub fn selected_contents(&self) -> &[SelectedContent] {
        &self.input.selected_contents
    }

    pub fn connections(&self) -> &[Connection] {
        &self.input.connections
    }

    pub fn accumulated_outputs(&self) -> &BTreeMap<AgentRole, String> {
        &self.accumulated_outputs
    }

    pub fn output_of(&self, role: AgentRole) -> Option<&str> {
        self.accumulated_outputs.get(&role).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> OrchestrationInput {
        OrchestrationInput {
            request_id: "req_1".into(),
            prompt: "What changed?".into(),
            request_type: RequestType::Ask,
            retrieval_mode: RetrievalMode::Auto,
            selected_contents: vec![SelectedContent::new(1, "Note", "summary")],
            connections: vec![],
        }
    }

    #[test]
    fn test_view_is_a_snapshot() {
        let mut context = OrchestrationContext::new(input());
        let before = context.view();
        context.merge_output(AgentRole::Summarizer, "summary text".into());
        let after = context.view();

        assert!(before.output_of(AgentRole::Summarizer).is_none());
        assert_eq!(after.output_of(AgentRole::Summarizer), Some("summary text"));
        assert_eq!(after.prompt(), "What changed?");
        assert_eq!(after.selected_contents().len(), 1);
    }

    #[test]
    fn test_warnings_keep_order() {
        let mut context = OrchestrationContext::new(input());
        context.push_warning(AgentWarning::new(AgentRole::Researcher, "first"));
        context.push_warning(AgentWarning::new(AgentRole::Analyzer, "second"));
        let messages: Vec<_> = context.warnings().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
