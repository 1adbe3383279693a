//! Infrastructure layer for draftsmith
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod content;
pub mod logging;
pub mod pricing;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileOutputConfig, FileOutputFormat, Severity,
};
pub use content::{JsonContentStore, load_connections};
pub use logging::JsonlEventLogger;
pub use pricing::{HeuristicTokenCounter, WtuCalculator};
pub use providers::{
    ProviderAdapter, ProviderKind, openai::OpenAiCompatibleProvider, routing::RoutingProvider,
};
