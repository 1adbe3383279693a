//! Content store port
//!
//! Read-only lookup of the items a request selected. Called once per request,
//! before any agent runs.

use async_trait::async_trait;
use draftsmith_domain::SelectedContent;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentStoreError {
    #[error("Content not found: {0:?}")]
    NotFound(Vec<i64>),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed content record: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch contents in the order of `ids`.
    async fn get_contents_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<SelectedContent>, ContentStoreError>;
}

/// Store that holds nothing, for requests that carry their contents inline.
pub struct NoContentStore;

#[async_trait]
impl ContentStore for NoContentStore {
    async fn get_contents_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<SelectedContent>, ContentStoreError> {
        if ids.is_empty() {
            Ok(vec![])
        } else {
            Err(ContentStoreError::NotFound(ids.to_vec()))
        }
    }
}
