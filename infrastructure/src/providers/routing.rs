use super::openai::OpenAiCompatibleProvider;
use super::{ProviderAdapter, ProviderKind};
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use draftsmith_application::{ModelProvider, ProviderError};
use draftsmith_domain::{Completion, CompletionOptions, Message, Model};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Dispatches each completion to the adapter that serves its model.
pub struct RoutingProvider {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    /// Model alias to index into `providers`
    explicit_model_routing: HashMap<String, usize>,
    default_kind: ProviderKind,
}

impl RoutingProvider {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>, config: &FileProvidersConfig) -> Self {
        let mut explicit_model_routing = HashMap::new();

        for (model_name, provider_name) in &config.routing {
            let Some(target_kind) = ProviderKind::parse(provider_name) else {
                warn!("Ignoring routing for {}: unknown provider '{}'", model_name, provider_name);
                continue;
            };
            if let Some(idx) = providers.iter().position(|p| p.kind() == target_kind) {
                explicit_model_routing.insert(model_name.clone(), idx);
            }
        }

        let default_kind = config
            .default
            .as_deref()
            .and_then(ProviderKind::parse)
            .unwrap_or_default();

        Self {
            providers,
            explicit_model_routing,
            default_kind,
        }
    }

    /// One OpenAI-compatible adapter per configured family.
    pub fn from_config(config: &FileProvidersConfig) -> Self {
        let endpoints = [
            (ProviderKind::OpenAi, &config.openai),
            (ProviderKind::Anthropic, &config.anthropic),
            (ProviderKind::Gemini, &config.gemini),
            (ProviderKind::Perplexity, &config.perplexity),
        ];
        let providers = endpoints
            .into_iter()
            .map(|(kind, endpoint)| {
                Arc::new(OpenAiCompatibleProvider::new(kind, endpoint)) as Arc<dyn ProviderAdapter>
            })
            .collect();
        Self::new(providers, config)
    }

    /// Routing priority:
    ///  1. explicit `[providers.routing]` entry for the model alias
    ///  2. the model family's provider
    ///  3. the configured default provider
    ///  4. the first registered provider
    fn resolve_provider(&self, model: &Model) -> Result<&dyn ProviderAdapter, ProviderError> {
        if let Some(&idx) = self.explicit_model_routing.get(model.as_str()) {
            return Ok(self.providers[idx].as_ref());
        }

        if let Some(kind) = ProviderKind::for_model(model)
            && let Some(p) = self.providers.iter().find(|p| p.kind() == kind)
        {
            return Ok(p.as_ref());
        }

        if let Some(p) = self
            .providers
            .iter()
            .find(|p| p.kind() == self.default_kind)
        {
            return Ok(p.as_ref());
        }

        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or(ProviderError::ModelNotAvailable(
                "No providers available".to_string(),
            ))
    }
}

#[async_trait]
impl ModelProvider for RoutingProvider {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ProviderError> {
        self.resolve_provider(model)?
            .complete(model, messages, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockAdapter {
        kind: ProviderKind,
    }

    impl MockAdapter {
        fn new(kind: ProviderKind) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self { kind })
        }
    }

    #[async_trait]
    impl ModelProvider for MockAdapter {
        async fn complete(
            &self,
            _model: &Model,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<Completion, ProviderError> {
            Ok(Completion::new(self.kind.as_str()))
        }
    }

    impl ProviderAdapter for MockAdapter {
        fn kind(&self) -> ProviderKind {
            self.kind
        }
    }

    fn all_adapters() -> Vec<Arc<dyn ProviderAdapter>> {
        ProviderKind::ALL.into_iter().map(MockAdapter::new).collect()
    }

    async fn served_by(router: &RoutingProvider, model: Model) -> String {
        router
            .complete(&model, &[], &CompletionOptions::default())
            .await
            .unwrap()
            .content
    }

    #[tokio::test]
    async fn test_family_routing() {
        let router = RoutingProvider::new(all_adapters(), &FileProvidersConfig::default());
        assert_eq!(served_by(&router, Model::ClaudeHaiku45).await, "anthropic");
        assert_eq!(served_by(&router, Model::Gpt5).await, "openai");
        assert_eq!(served_by(&router, Model::Gemini20Flash).await, "gemini");
        assert_eq!(served_by(&router, Model::Pplx70bOnline).await, "perplexity");
    }

    #[tokio::test]
    async fn test_explicit_routing_wins_over_family() {
        let mut config = FileProvidersConfig::default();
        config.routing.insert("gpt-5".into(), "anthropic".into());
        let router = RoutingProvider::new(all_adapters(), &config);
        assert_eq!(served_by(&router, Model::Gpt5).await, "anthropic");
        assert_eq!(served_by(&router, Model::Gpt41).await, "openai");
    }

    #[tokio::test]
    async fn test_unknown_model_uses_default() {
        let mut config = FileProvidersConfig::default();
        config.default = Some("gemini".into());
        let router = RoutingProvider::new(all_adapters(), &config);
        assert_eq!(served_by(&router, Model::from("mistral-large")).await, "gemini");
    }

    #[tokio::test]
    async fn test_falls_back_to_first_provider() {
        let router = RoutingProvider::new(
            vec![MockAdapter::new(ProviderKind::Perplexity)],
            &FileProvidersConfig::default(),
        );
        assert_eq!(served_by(&router, Model::ClaudeOpus45).await, "perplexity");
    }

    #[tokio::test]
    async fn test_no_providers() {
        let router = RoutingProvider::new(vec![], &FileProvidersConfig::default());
        let err = router
            .complete(&Model::Gpt5, &[], &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotAvailable(_)));
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("Anthropic"), Some(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::parse("bedrock"), None);
    }
}
