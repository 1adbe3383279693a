//! Test doubles shared by the use case tests

use crate::config::FallbackTable;
use crate::invocation::ModelInvoker;
use crate::ports::model_provider::{ModelProvider, ProviderError};
use crate::ports::pricing::{CostCalculator, TokenCounter};
use async_trait::async_trait;
use draftsmith_domain::{
    AgentRole, Completion, CompletionOptions, Message, Model, PromptTemplate, Role,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Respond = dyn Fn(AgentRole, &Model) -> Result<Completion, ProviderError> + Send + Sync;

/// Provider whose reply is a function of the calling role and the model
pub struct MockProvider {
    respond: Box<Respond>,
    delay: Duration,
    calls: Mutex<Vec<(AgentRole, Model, Vec<Message>)>>,
}

impl MockProvider {
    pub fn new(
        respond: impl Fn(AgentRole, &Model) -> Result<Completion, ProviderError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: Mutex::new(vec![]),
        }
    }

    /// Every call succeeds with `"<role> output"` and 100/50 tokens.
    pub fn echo() -> Self {
        Self::new(|role, _| Ok(Completion::new(format!("{role} output")).with_usage(100, 50)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<(AgentRole, Model, Vec<Message>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, role: AgentRole) -> Vec<(Model, Vec<Message>)> {
        self.calls()
            .into_iter()
            .filter(|(r, _, _)| *r == role)
            .map(|(_, model, messages)| (model, messages))
            .collect()
    }
}

/// Identify the calling role from its system prompt.
pub fn role_of(messages: &[Message]) -> AgentRole {
    let system = messages
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    [
        (PromptTemplate::planner_system(), AgentRole::Planner),
        (PromptTemplate::summarizer_system(), AgentRole::Summarizer),
        (PromptTemplate::analyzer_system(), AgentRole::Analyzer),
        (PromptTemplate::researcher_system(), AgentRole::Researcher),
    ]
    .into_iter()
    .find(|(prompt, _)| *prompt == system)
    .map(|(_, role)| role)
    .unwrap_or(AgentRole::Writer)
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<Completion, ProviderError> {
        let role = role_of(messages);
        self.calls
            .lock()
            .unwrap()
            .push((role, model.clone(), messages.to_vec()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(role, model)
    }
}

/// `(input + output) / 1000`, at least 1
pub struct SimpleWtu;

impl CostCalculator for SimpleWtu {
    fn cost_units(&self, _model: &Model, input_tokens: u64, output_tokens: u64) -> u64 {
        ((input_tokens + output_tokens) / 1000).max(1)
    }
}

pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str, _model: &Model) -> u64 {
        text.split_whitespace().count() as u64
    }
}

pub fn invoker(provider: Arc<MockProvider>) -> Arc<ModelInvoker<MockProvider>> {
    Arc::new(ModelInvoker::new(
        provider,
        Arc::new(FallbackTable::default()),
        Arc::new(WordCounter),
    ))
}
