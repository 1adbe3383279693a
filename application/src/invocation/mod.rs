//! Tier invocation with ordered fallback across candidates.

pub mod model_invoker;

pub use model_invoker::{AllProvidersFailed, CandidateFailure, ModelInvoker};
