//! Model invocation port
//!
//! "Call a tier with messages, get content and token counts, or fail." The
//! invoker owns the fallback loop: candidates of the tier are tried strictly
//! in order, each under the call timeout, until one succeeds.

use crate::config::FallbackTable;
use crate::ports::model_provider::{ModelProvider, ProviderError};
use crate::ports::pricing::TokenCounter;
use draftsmith_domain::llm::message::joined_content;
use draftsmith_domain::{CompletionOptions, Invocation, Message, Model, Tier};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// One failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub model: Model,
    pub reason: String,
}

/// Every candidate of a tier failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("All providers failed for tier '{tier}' ({} attempts)", failures.len())]
pub struct AllProvidersFailed {
    pub tier: Tier,
    /// One entry per attempted candidate, in attempt order
    pub failures: Vec<CandidateFailure>,
}

pub struct ModelInvoker<P: ModelProvider + 'static> {
    provider: Arc<P>,
    table: Arc<FallbackTable>,
    token_counter: Arc<dyn TokenCounter>,
    call_timeout: Duration,
}

impl<P: ModelProvider + 'static> ModelInvoker<P> {
    pub fn new(
        provider: Arc<P>,
        table: Arc<FallbackTable>,
        token_counter: Arc<dyn TokenCounter>,
    ) -> Self {
        Self {
            provider,
            table,
            token_counter,
            call_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn table(&self) -> &FallbackTable {
        &self.table
    }

    pub fn token_counter(&self) -> &dyn TokenCounter {
        self.token_counter.as_ref()
    }

    /// Call `tier`, falling back through its candidates.
    ///
    /// `preferred` is tried before the tier's own list. No other tier is ever
    /// tried.
    pub async fn invoke(
        &self,
        tier: Tier,
        messages: &[Message],
        options: &CompletionOptions,
        preferred: Option<&Model>,
    ) -> Result<Invocation, AllProvidersFailed> {
        let candidates = self.table.attempt_order(tier, preferred);
        let mut failures = Vec::with_capacity(candidates.len());

        for model in candidates {
            debug!("Invoking {} (tier {})", model, tier);
            match self.call_once(&model, messages, options).await {
                Ok(invocation) => {
                    if !failures.is_empty() {
                        info!(
                            "Tier {} served by {} after {} failed attempt(s)",
                            tier,
                            model,
                            failures.len()
                        );
                    }
                    return Ok(invocation);
                }
                Err(e) => {
                    warn!("Candidate {} failed for tier {}: {}", model, tier, e);
                    failures.push(CandidateFailure {
                        model,
                        reason: e.to_string(),
                    });
                }
            }
        }

        warn!("All {} candidate(s) failed for tier {}", failures.len(), tier);
        Err(AllProvidersFailed { tier, failures })
    }

    async fn call_once(
        &self,
        model: &Model,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Invocation, ProviderError> {
        let completion = tokio::time::timeout(
            self.call_timeout,
            self.provider.complete(model, messages, options),
        )
        .await
        .map_err(|_| ProviderError::Timeout)??;

        let (input_tokens, output_tokens) = match completion.usage {
            Some(usage) => (usage.input_tokens, usage.output_tokens),
            None => (
                self.token_counter
                    .count_tokens(&joined_content(messages), model),
                self.token_counter.count_tokens(&completion.content, model),
            ),
        };

        Ok(Invocation {
            content: completion.content,
            model_used: model.clone(),
            input_tokens,
            output_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use draftsmith_domain::Completion;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Fails for every model in `failing`, succeeds otherwise
    struct ScriptedProvider {
        failing: HashSet<Model>,
        hang: HashSet<Model>,
        calls: Mutex<Vec<Model>>,
        report_usage: bool,
    }

    impl ScriptedProvider {
        fn new(failing: &[Model]) -> Self {
            Self {
                failing: failing.iter().cloned().collect(),
                hang: HashSet::new(),
                calls: Mutex::new(vec![]),
                report_usage: true,
            }
        }

        fn calls(&self) -> Vec<Model> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn complete(
            &self,
            model: &Model,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<Completion, ProviderError> {
            self.calls.lock().unwrap().push(model.clone());
            if self.hang.contains(model) {
                std::future::pending::<()>().await;
            }
            if self.failing.contains(model) {
                return Err(ProviderError::RequestFailed(format!("{model} is down")));
            }
            let completion = Completion::new(format!("from {model}"));
            Ok(if self.report_usage {
                completion.with_usage(10, 5)
            } else {
                completion
            })
        }
    }

    struct CharCounter;

    impl TokenCounter for CharCounter {
        fn count_tokens(&self, text: &str, _model: &Model) -> u64 {
            text.chars().count() as u64
        }
    }

    fn invoker(provider: ScriptedProvider) -> (ModelInvoker<ScriptedProvider>, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let invoker = ModelInvoker::new(
            Arc::clone(&provider),
            Arc::new(FallbackTable::default()),
            Arc::new(CharCounter),
        );
        (invoker, provider)
    }

    fn messages() -> Vec<Message> {
        vec![Message::user("hello")]
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let (invoker, provider) = invoker(ScriptedProvider::new(&[]));
        let result = invoker
            .invoke(Tier::Light, &messages(), &CompletionOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(result.model_used, Model::ClaudeHaiku45);
        assert_eq!(result.input_tokens, 10);
        assert_eq!(provider.calls(), vec![Model::ClaudeHaiku45]);
    }

    #[tokio::test]
    async fn test_falls_back_in_order() {
        let (invoker, provider) = invoker(ScriptedProvider::new(&[Model::ClaudeHaiku45]));
        let result = invoker
            .invoke(Tier::Light, &messages(), &CompletionOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(result.model_used, Model::Gpt41Mini);
        assert_eq!(result.content, "from gpt-4.1-mini");
        assert_eq!(provider.calls(), vec![Model::ClaudeHaiku45, Model::Gpt41Mini]);
    }

    #[tokio::test]
    async fn test_exhaustion_records_every_attempt() {
        let (invoker, provider) = invoker(ScriptedProvider::new(&[
            Model::ClaudeHaiku45,
            Model::Gpt41Mini,
            Model::Gemini20Flash,
        ]));
        let err = invoker
            .invoke(Tier::Light, &messages(), &CompletionOptions::default(), None)
            .await
            .unwrap_err();
        assert_eq!(err.tier, Tier::Light);
        assert_eq!(err.failures.len(), 3);
        assert_eq!(err.failures[2].model, Model::Gemini20Flash);
        assert!(err.failures[0].reason.contains("claude-4.5-haiku is down"));
        // Never crosses into another tier
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_preferred_model_is_tried_first() {
        let (invoker, provider) = invoker(ScriptedProvider::new(&[]));
        let preferred = Model::ClaudeSonnet45;
        let result = invoker
            .invoke(
                Tier::Standard,
                &messages(),
                &CompletionOptions::default(),
                Some(&preferred),
            )
            .await
            .unwrap();
        assert_eq!(result.model_used, Model::ClaudeSonnet45);
        assert_eq!(provider.calls(), vec![Model::ClaudeSonnet45]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_candidate_failure() {
        let mut scripted = ScriptedProvider::new(&[]);
        scripted.hang.insert(Model::Pplx70bOnline);
        let (invoker, _) = invoker(scripted);
        let invoker = invoker.with_call_timeout(Duration::from_secs(1));

        let result = invoker
            .invoke(Tier::Search, &messages(), &CompletionOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(result.model_used, Model::PplxOnlineMini);
    }

    #[tokio::test]
    async fn test_counts_tokens_when_usage_missing() {
        let mut scripted = ScriptedProvider::new(&[]);
        scripted.report_usage = false;
        let (invoker, _) = invoker(scripted);
        let result = invoker
            .invoke(Tier::Premium, &messages(), &CompletionOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(result.input_tokens, "hello".len() as u64);
        assert_eq!(result.output_tokens, "from gpt-5".len() as u64);
    }
}
