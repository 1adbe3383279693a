//! Role-specific behaviors.
//!
//! Each role supplies how to build its messages from a [`ContextView`] and
//! how to extract a result from the raw model output. The shared run loop
//! (invoke, classify failures, account usage) lives in the application
//! layer and dispatches through [`AgentRole::behavior`].

use super::output::AgentOutput;
use super::plan_parser::parse_decision;
use super::role::AgentRole;
use crate::llm::message::Message;
use crate::orchestration::context::ContextView;
use crate::prompt::PromptTemplate;

pub trait AgentBehavior: Send + Sync {
    fn role(&self) -> AgentRole;

    fn build_messages(&self, view: &ContextView) -> Vec<Message>;

    fn extract_result(&self, raw: &str) -> AgentOutput;
}

pub struct PlannerBehavior;
pub struct SummarizerBehavior;
pub struct AnalyzerBehavior;
pub struct ResearcherBehavior;
pub struct WriterBehavior;

impl AgentRole {
    /// Behavior implementing this role.
    pub fn behavior(&self) -> &'static dyn AgentBehavior {
        match self {
            AgentRole::Planner => &PlannerBehavior,
            AgentRole::Summarizer => &SummarizerBehavior,
            AgentRole::Analyzer => &AnalyzerBehavior,
            AgentRole::Researcher => &ResearcherBehavior,
            AgentRole::Writer => &WriterBehavior,
        }
    }
}

impl AgentBehavior for PlannerBehavior {
    fn role(&self) -> AgentRole {
        AgentRole::Planner
    }

    fn build_messages(&self, view: &ContextView) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::planner_system()),
            Message::user(PromptTemplate::planner_prompt(
                view.prompt(),
                view.retrieval_mode().as_str(),
                view.selected_contents().len(),
                view.connections().len(),
            )),
        ]
    }

    fn extract_result(&self, raw: &str) -> AgentOutput {
        AgentOutput::Decision {
            decision: parse_decision(raw),
        }
    }
}

impl AgentBehavior for SummarizerBehavior {
    fn role(&self) -> AgentRole {
        AgentRole::Summarizer
    }

    fn build_messages(&self, view: &ContextView) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::summarizer_system()),
            Message::user(PromptTemplate::summarizer_prompt(
                view.prompt(),
                view.selected_contents(),
            )),
        ]
    }

    fn extract_result(&self, raw: &str) -> AgentOutput {
        AgentOutput::text(raw.trim())
    }
}

impl AgentBehavior for AnalyzerBehavior {
    fn role(&self) -> AgentRole {
        AgentRole::Analyzer
    }

    fn build_messages(&self, view: &ContextView) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::analyzer_system()),
            Message::user(PromptTemplate::analyzer_prompt(
                view.prompt(),
                view.selected_contents(),
                view.connections(),
                view.accumulated_outputs(),
            )),
        ]
    }

    fn extract_result(&self, raw: &str) -> AgentOutput {
        AgentOutput::text(raw.trim())
    }
}

impl AgentBehavior for ResearcherBehavior {
    fn role(&self) -> AgentRole {
        AgentRole::Researcher
    }

    fn build_messages(&self, view: &ContextView) -> Vec<Message> {
        let titles: Vec<&str> = view
            .selected_contents()
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        vec![
            Message::system(PromptTemplate::researcher_system()),
            Message::user(PromptTemplate::researcher_prompt(view.prompt(), &titles)),
        ]
    }

    fn extract_result(&self, raw: &str) -> AgentOutput {
        AgentOutput::text(raw.trim())
    }
}

impl AgentBehavior for WriterBehavior {
    fn role(&self) -> AgentRole {
        AgentRole::Writer
    }

    fn build_messages(&self, view: &ContextView) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::writer_system()),
            Message::user(PromptTemplate::writer_prompt(
                view.prompt(),
                view.selected_contents(),
                view.accumulated_outputs(),
            )),
        ]
    }

    fn extract_result(&self, raw: &str) -> AgentOutput {
        AgentOutput::draft(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::entities::SelectedContent;
    use crate::orchestration::context::{OrchestrationContext, OrchestrationInput};
    use crate::orchestration::plan::{RequestType, RetrievalMode};

    fn context() -> OrchestrationContext {
        OrchestrationContext::new(OrchestrationInput {
            request_id: "r".into(),
            prompt: "Write about tides".into(),
            request_type: RequestType::Draft,
            retrieval_mode: RetrievalMode::Auto,
            selected_contents: vec![SelectedContent::new(3, "Tides", "moon pulls water")],
            connections: vec![],
        })
    }

    #[test]
    fn test_dispatch_matches_role() {
        for role in [
            AgentRole::Planner,
            AgentRole::Summarizer,
            AgentRole::Analyzer,
            AgentRole::Researcher,
            AgentRole::Writer,
        ] {
            assert_eq!(role.behavior().role(), role);
        }
    }

    #[test]
    fn test_writer_sees_summarizer_output() {
        let mut context = context();
        context.merge_output(AgentRole::Summarizer, "Tides follow the moon.".into());
        let messages = AgentRole::Writer.behavior().build_messages(&context.view());
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("Tides follow the moon."));
    }

    #[test]
    fn test_summarizer_includes_content_body() {
        let messages = AgentRole::Summarizer.behavior().build_messages(&context().view());
        assert!(messages[1].content.contains("moon pulls water"));
    }

    #[test]
    fn test_planner_extracts_decision() {
        let output = AgentRole::Planner
            .behavior()
            .extract_result(r#"{"agents": ["writer"]}"#);
        assert!(output.decision().is_some_and(|d| d.contains(AgentRole::Writer)));
    }
}
