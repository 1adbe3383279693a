//! Presentation layer for draftsmith
//!
//! This crate contains CLI definitions, the SSE transport, output
//! formatters and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod sse;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, RequestArgs};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use sse::{EventFilter, SseFrame, encode, sse_stream};
