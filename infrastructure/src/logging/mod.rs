//! Logging infrastructure: structured event logs.
//!
//! Provides [`JsonlEventLogger`], an [`EventSink`](draftsmith_application::EventSink)
//! decorator that tees every stream event into a JSONL file.

mod jsonl_event_logger;

pub use jsonl_event_logger::JsonlEventLogger;
