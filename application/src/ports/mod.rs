//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod content_store;
pub mod event_sink;
pub mod model_provider;
pub mod pricing;
