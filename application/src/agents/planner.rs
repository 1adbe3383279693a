//! Plan construction
//!
//! `draft` requests get a fixed summarizer → writer plan. `ask` requests are
//! planned by the planner agent, with a deterministic heuristic taking over
//! when the planner is unavailable or answers with something unparseable.

use super::runner::AgentRunner;
use crate::ports::model_provider::ModelProvider;
use draftsmith_domain::{
    AgentResult, AgentRole, AgentSpec, ContextView, DomainError, ExecutionPlan, PlanMetadata,
    PlannedAgent, PlannerDecision, RetrievalMode,
};
use tracing::{debug, info};

/// Fixed two-stage plan for `draft` requests.
pub fn draft_plan(plan_id: String, metadata: PlanMetadata) -> Result<ExecutionPlan, DomainError> {
    ExecutionPlan::builder(plan_id, metadata)
        .single(AgentSpec::new(AgentRole::Summarizer, "condense the selected contents"))
        .single(AgentSpec::new(AgentRole::Writer, "write the draft"))
        .build()
}

/// Decide agents from the request shape alone.
///
/// - summarizer if contents are selected (and the mode allows them)
/// - researcher for `web_only`/`both`, or `auto` without contents
/// - analyzer with two or more contents, any connection, or when both the
///   summarizer and the researcher run
/// - writer always
pub fn heuristic_decision(view: &ContextView) -> PlannerDecision {
    let mode = view.retrieval_mode();
    let content_count = view.selected_contents().len();
    let has_connections = !view.connections().is_empty();

    let summarize = content_count > 0 && mode.allows_contents();
    let research = match mode {
        RetrievalMode::WebOnly | RetrievalMode::Both => true,
        RetrievalMode::Auto => content_count == 0,
        RetrievalMode::RagOnly => false,
    };
    let analyze = content_count >= 2 || has_connections || (summarize && research);

    let mut agents = Vec::new();
    if summarize {
        agents.push(planned(
            AgentRole::Summarizer,
            format!("{content_count} selected content(s)"),
        ));
    }
    if research {
        agents.push(planned(
            AgentRole::Researcher,
            format!("retrieval mode {}", mode.as_str()),
        ));
    }
    if analyze {
        agents.push(planned(AgentRole::Analyzer, "several sources to structure"));
    }
    agents.push(planned(AgentRole::Writer, "final answer"));
    PlannerDecision { agents }
}

fn planned(role: AgentRole, reason: impl Into<String>) -> PlannedAgent {
    PlannedAgent {
        role,
        reason: reason.into(),
    }
}

/// Turn a decision into a plan, enforcing what the request allows.
///
/// Summarizer and researcher share a parallel first stage, the analyzer
/// follows them, and the writer is always last. Stage indices stay dense
/// whichever roles are absent.
pub fn build_plan(
    plan_id: String,
    metadata: PlanMetadata,
    decision: &PlannerDecision,
) -> Result<ExecutionPlan, DomainError> {
    let mode = metadata.retrieval_mode;
    let has_contents = metadata.selected_content_count > 0;

    let allowed = |role: AgentRole| match role {
        AgentRole::Summarizer => has_contents && mode.allows_contents(),
        AgentRole::Researcher => mode.allows_web(),
        AgentRole::Analyzer | AgentRole::Writer => true,
        AgentRole::Planner => false,
    };
    let spec_for = |role: AgentRole, default_reason: &str| {
        let reason = decision
            .reason_for(role)
            .filter(|r| !r.is_empty())
            .unwrap_or(default_reason);
        AgentSpec::new(role, reason)
    };

    let first_stage: Vec<AgentSpec> = [AgentRole::Summarizer, AgentRole::Researcher]
        .into_iter()
        .filter(|role| decision.contains(*role) && allowed(*role))
        .map(|role| spec_for(role, "requested by planner"))
        .collect();

    let mut builder = ExecutionPlan::builder(plan_id, metadata);
    if !first_stage.is_empty() {
        builder = builder.parallel_stage(first_stage);
    }
    if decision.contains(AgentRole::Analyzer) {
        builder = builder.single(spec_for(AgentRole::Analyzer, "requested by planner"));
    }
    builder
        .single(spec_for(AgentRole::Writer, "final answer"))
        .build()
}

/// Planner for `ask` requests
pub struct Planner<P: ModelProvider + 'static> {
    runner: AgentRunner<P>,
}

/// A plan together with the planner agent's own result
pub struct PlanOutcome {
    pub plan: ExecutionPlan,
    pub planner_result: AgentResult,
    /// `true` when the heuristic decided instead of the planner agent
    pub used_heuristic: bool,
}

impl<P: ModelProvider + 'static> Planner<P> {
    pub fn new(runner: AgentRunner<P>) -> Self {
        Self { runner }
    }

    pub async fn plan(
        &self,
        plan_id: String,
        metadata: PlanMetadata,
        view: &ContextView,
    ) -> Result<PlanOutcome, DomainError> {
        let planner_result = self.runner.run(AgentRole::Planner, view).await;

        let llm_decision = planner_result
            .output
            .as_ref()
            .and_then(|output| output.decision())
            .cloned();
        let used_heuristic = llm_decision.is_none();
        let decision = match llm_decision {
            Some(decision) => decision,
            None => {
                info!(
                    "Planner gave no usable decision ({}), using heuristic",
                    planner_result.status
                );
                heuristic_decision(view)
            }
        };

        let plan = build_plan(plan_id, metadata, &decision)?;
        debug!(
            "Planned {} stage(s): {:?}",
            plan.total_stages(),
            plan.stages()
                .iter()
                .map(|s| s.roles().collect::<Vec<_>>())
                .collect::<Vec<_>>()
        );

        Ok(PlanOutcome {
            plan,
            planner_result,
            used_heuristic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_provider::ProviderError;
    use crate::testing::{MockProvider, SimpleWtu, invoker};
    use draftsmith_domain::{
        AgentStatus, Completion, Connection, OrchestrationContext, OrchestrationInput,
        RequestType, SelectedContent,
    };
    use std::sync::Arc;

    fn view(mode: RetrievalMode, contents: usize, connections: usize) -> ContextView {
        OrchestrationContext::new(OrchestrationInput {
            request_id: "r".into(),
            prompt: "q".into(),
            request_type: RequestType::Ask,
            retrieval_mode: mode,
            selected_contents: (0..contents as i64)
                .map(|i| SelectedContent::new(i, format!("c{i}"), "s"))
                .collect(),
            connections: (0..connections as i64).map(|i| Connection::new(i, i + 1)).collect(),
        })
        .view()
    }

    fn metadata(view: &ContextView) -> PlanMetadata {
        PlanMetadata::new(RequestType::Ask, view.retrieval_mode())
            .with_selected_content_count(view.selected_contents().len())
    }

    fn stage_roles(plan: &ExecutionPlan) -> Vec<Vec<AgentRole>> {
        plan.stages().iter().map(|s| s.roles().collect()).collect()
    }

    fn heuristic_plan(view: &ContextView) -> ExecutionPlan {
        build_plan("p".into(), metadata(view), &heuristic_decision(view)).unwrap()
    }

    #[test]
    fn test_draft_plan_shape() {
        let plan = draft_plan(
            "p".into(),
            PlanMetadata::new(RequestType::Draft, RetrievalMode::Auto),
        )
        .unwrap();
        assert_eq!(
            stage_roles(&plan),
            vec![vec![AgentRole::Summarizer], vec![AgentRole::Writer]]
        );
        assert!(plan.stages().iter().all(|s| !s.is_parallel()));
    }

    #[test]
    fn test_single_content_auto_is_summarize_then_write() {
        let plan = heuristic_plan(&view(RetrievalMode::Auto, 1, 0));
        assert_eq!(
            stage_roles(&plan),
            vec![vec![AgentRole::Summarizer], vec![AgentRole::Writer]]
        );
    }

    #[test]
    fn test_no_contents_auto_researches() {
        let plan = heuristic_plan(&view(RetrievalMode::Auto, 0, 0));
        assert_eq!(
            stage_roles(&plan),
            vec![vec![AgentRole::Researcher], vec![AgentRole::Writer]]
        );
    }

    #[test]
    fn test_both_mode_builds_full_pipeline() {
        let plan = heuristic_plan(&view(RetrievalMode::Both, 1, 0));
        assert_eq!(
            stage_roles(&plan),
            vec![
                vec![AgentRole::Summarizer, AgentRole::Researcher],
                vec![AgentRole::Analyzer],
                vec![AgentRole::Writer]
            ]
        );
        assert!(plan.stages()[0].is_parallel());
        let indices: Vec<_> = plan.stages().iter().map(|s| s.stage_index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_rag_only_never_researches() {
        let plan = heuristic_plan(&view(RetrievalMode::RagOnly, 0, 0));
        assert_eq!(stage_roles(&plan), vec![vec![AgentRole::Writer]]);
    }

    #[test]
    fn test_web_only_never_summarizes() {
        let plan = heuristic_plan(&view(RetrievalMode::WebOnly, 3, 0));
        assert!(!plan.stages().iter().any(|s| s.contains(AgentRole::Summarizer)));
        assert!(plan.stages()[0].contains(AgentRole::Researcher));
    }

    #[test]
    fn test_connections_bring_in_the_analyzer() {
        let plan = heuristic_plan(&view(RetrievalMode::RagOnly, 1, 1));
        assert_eq!(
            stage_roles(&plan),
            vec![
                vec![AgentRole::Summarizer],
                vec![AgentRole::Analyzer],
                vec![AgentRole::Writer]
            ]
        );
    }

    #[test]
    fn test_planner_decision_is_filtered_by_mode() {
        let view = view(RetrievalMode::RagOnly, 1, 0);
        let decision = PlannerDecision {
            agents: vec![planned(AgentRole::Researcher, "web")],
        };
        let plan = build_plan("p".into(), metadata(&view), &decision).unwrap();
        assert_eq!(stage_roles(&plan), vec![vec![AgentRole::Writer]]);
    }

    #[tokio::test]
    async fn test_llm_decision_is_used() {
        let provider = Arc::new(MockProvider::new(|role, _| {
            let text = match role {
                AgentRole::Planner => r#"{"agents": [{"agent": "analyzer", "reason": "compare"}]}"#,
                _ => "unused",
            };
            Ok(Completion::new(text).with_usage(20, 10))
        }));
        let runner = AgentRunner::new(invoker(provider), Arc::new(SimpleWtu));
        let view = view(RetrievalMode::Auto, 1, 0);

        let outcome = Planner::new(runner)
            .plan("p".into(), metadata(&view), &view)
            .await
            .unwrap();
        assert!(!outcome.used_heuristic);
        assert_eq!(outcome.planner_result.usage.input_tokens, 20);
        assert_eq!(
            stage_roles(&outcome.plan),
            vec![vec![AgentRole::Analyzer], vec![AgentRole::Writer]]
        );
        assert_eq!(outcome.plan.stages()[0].agents()[0].reason, "compare");
    }

    #[tokio::test]
    async fn test_unavailable_planner_falls_back_to_heuristic() {
        let provider = Arc::new(MockProvider::new(|_, model| {
            Err(ProviderError::ConnectionError(model.to_string()))
        }));
        let runner = AgentRunner::new(invoker(provider), Arc::new(SimpleWtu));
        let view = view(RetrievalMode::Auto, 1, 0);

        let outcome = Planner::new(runner)
            .plan("p".into(), metadata(&view), &view)
            .await
            .unwrap();
        assert!(outcome.used_heuristic);
        assert_eq!(outcome.planner_result.status, AgentStatus::Skipped);
        assert_eq!(
            stage_roles(&outcome.plan),
            vec![vec![AgentRole::Summarizer], vec![AgentRole::Writer]]
        );
    }
}
