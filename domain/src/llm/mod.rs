//! Model call vocabulary.
//!
//! - [`message::Message`]: a single chat message handed to a model
//! - [`completion::Completion`]: what one candidate model returned
//! - [`completion::CompletionOptions`]: sampling options shared across candidates

pub mod completion;
pub mod message;
