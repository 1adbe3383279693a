//! Model provider port
//!
//! Defines the interface for a single completion call against one model.
//! Fallback across a tier's candidates is handled above this port by the
//! [`ModelInvoker`](crate::invocation::model_invoker::ModelInvoker).

use async_trait::async_trait;
use draftsmith_domain::{Completion, CompletionOptions, Message, Model};
use thiserror::Error;

/// Errors a single candidate call can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for one completion call
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send `messages` to `model` and return its reply.
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, ProviderError>;
}
