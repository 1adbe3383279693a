//! OpenAI-compatible chat-completions adapter

use super::{ProviderAdapter, ProviderKind};
use crate::config::FileEndpointConfig;
use async_trait::async_trait;
use draftsmith_application::{ModelProvider, ProviderError};
use draftsmith_domain::util::truncate_chars;
use draftsmith_domain::{Completion, CompletionOptions, Message, Model};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

/// Longest error body kept in a [`ProviderError`] message
const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct OpenAiCompatibleProvider {
    kind: ProviderKind,
    base_url: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    model_ids: BTreeMap<String, String>,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(kind: ProviderKind, config: &FileEndpointConfig) -> Self {
        Self {
            kind,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            max_tokens: config.max_tokens,
            model_ids: config.model_ids.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Provider-side id of a model alias
    pub fn model_id<'a>(&'a self, model: &'a Model) -> &'a str {
        self.model_ids
            .get(model.as_str())
            .map(String::as_str)
            .unwrap_or(model.as_str())
    }

    fn payload(&self, model: &Model, messages: &[Message], options: &CompletionOptions) -> serde_json::Value {
        let api_messages: Vec<_> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();

        let mut payload = json!({
            "model": self.model_id(model),
            "messages": api_messages,
            "temperature": options.temperature,
        });
        if let Some(max_tokens) = options.max_tokens.or(self.max_tokens) {
            payload["max_tokens"] = json!(max_tokens);
        }
        payload
    }
}

/// Extract content and usage from a chat-completions response body.
fn parse_response(data: &serde_json::Value) -> Result<Completion, ProviderError> {
    let content = data
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or_else(|| ProviderError::InvalidResponse("No message content in response".to_string()))?;

    let completion = Completion::new(content);
    let usage = data.get("usage");
    let prompt = usage.and_then(|u| u.get("prompt_tokens")).and_then(|v| v.as_u64());
    let completion_tokens = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(|v| v.as_u64());

    Ok(match (prompt, completion_tokens) {
        (Some(input), Some(output)) => completion.with_usage(input, output),
        _ => completion,
    })
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::ModelNotAvailable(format!("no API key configured for {}", self.kind))
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} ({})", url, self.model_id(model));

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.payload(model, messages, options))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = truncate_chars(&text, MAX_ERROR_BODY_CHARS).to_string();
            return Err(match status.as_u16() {
                429 => ProviderError::RateLimited(text),
                401 | 403 | 404 => ProviderError::ModelNotAvailable(format!("{status}: {text}")),
                _ => ProviderError::RequestFailed(format!("{status}: {text}")),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_response(&data)
    }
}

impl ProviderAdapter for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatibleProvider {
        let mut config = FileEndpointConfig::default();
        config.api_key = Some("sk-test".to_string());
        config.base_url = "http://localhost:1/v1/".to_string();
        config.model_ids.insert("pplx-online-mini".into(), "sonar".into());
        OpenAiCompatibleProvider::new(ProviderKind::OpenAi, &config)
    }

    #[test]
    fn test_payload_shape() {
        let provider = provider();
        let payload = provider.payload(
            &Model::PplxOnlineMini,
            &[Message::system("sys"), Message::user("hi")],
            &CompletionOptions::default().with_temperature(0.2).with_max_tokens(64),
        );
        assert_eq!(payload["model"], "sonar");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hi");
        assert_eq!(payload["max_tokens"], 64);
        assert_eq!(provider.base_url, "http://localhost:1/v1");
    }

    #[test]
    fn test_unmapped_alias_is_sent_as_is() {
        let provider = provider();
        assert_eq!(provider.model_id(&Model::Gpt41), "gpt-4.1");
    }

    #[test]
    fn test_parse_response_with_usage() {
        let data = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });
        let completion = parse_response(&data).unwrap();
        assert_eq!(completion.content, "Hello");
        assert_eq!(completion.usage.unwrap().input_tokens, 12);
    }

    #[test]
    fn test_parse_response_without_usage() {
        let data = json!({"choices": [{"message": {"content": "Hi"}}]});
        assert!(parse_response(&data).unwrap().usage.is_none());
    }

    #[test]
    fn test_parse_response_without_choices() {
        assert!(matches!(
            parse_response(&json!({"error": "x"})),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let mut config = FileEndpointConfig::default();
        config.api_key_env = "DRAFTSMITH_TEST_UNSET_KEY".to_string();
        let provider = OpenAiCompatibleProvider::new(ProviderKind::Gemini, &config);
        let err = provider
            .complete(&Model::Gemini20Flash, &[], &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotAvailable(_)));
    }
}
