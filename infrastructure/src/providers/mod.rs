//! Model provider adapters
//!
//! All supported families speak the OpenAI chat-completions protocol, so one
//! HTTP adapter ([`openai::OpenAiCompatibleProvider`]) serves each of them;
//! [`routing::RoutingProvider`] picks the adapter for a model.

pub mod openai;
pub mod routing;

use draftsmith_application::ModelProvider;
use draftsmith_domain::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Gemini,
    Perplexity,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Perplexity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Perplexity => "perplexity",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Family that serves `model` by default, if any.
    pub fn for_model(model: &Model) -> Option<Self> {
        if model.is_claude() {
            Some(ProviderKind::Anthropic)
        } else if model.is_gpt() {
            Some(ProviderKind::OpenAi)
        } else if model.is_gemini() {
            Some(ProviderKind::Gemini)
        } else if model.is_perplexity() {
            Some(ProviderKind::Perplexity)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider the router can dispatch to
pub trait ProviderAdapter: ModelProvider {
    fn kind(&self) -> ProviderKind;
}
