//! Content store adapters

mod json_store;

pub use json_store::{JsonContentStore, load_connections};
