//! Content store backed by a JSON file
//!
//! The file holds an array of content records:
//!
//! ```json
//! [{"content_id": 1, "title": "Intro", "summary": "...", "full_content": "..."}]
//! ```

use async_trait::async_trait;
use draftsmith_application::{ContentStore, ContentStoreError};
use draftsmith_domain::{Connection, SelectedContent};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct JsonContentStore {
    /// Records in file order
    contents: Vec<SelectedContent>,
    index: HashMap<i64, usize>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentStoreError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ContentStoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| ContentStoreError::Malformed(format!("{}: {}", path.display(), e)))
}

impl JsonContentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContentStoreError> {
        let path = path.as_ref();
        let store = Self::from_contents(read_json(path)?)?;
        debug!("Loaded {} contents from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn from_contents(contents: Vec<SelectedContent>) -> Result<Self, ContentStoreError> {
        let mut index = HashMap::with_capacity(contents.len());
        for (position, content) in contents.iter().enumerate() {
            if index.insert(content.content_id, position).is_some() {
                return Err(ContentStoreError::Malformed(format!(
                    "duplicate content_id {}",
                    content.content_id
                )));
            }
        }
        Ok(Self { contents, index })
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Ids of every record, in file order.
    pub fn ids(&self) -> Vec<i64> {
        self.contents.iter().map(|c| c.content_id).collect()
    }
}

#[async_trait]
impl ContentStore for JsonContentStore {
    async fn get_contents_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<SelectedContent>, ContentStoreError> {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !self.index.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(ContentStoreError::NotFound(missing));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|&position| self.contents[position].clone())
            .collect())
    }
}

/// Read a JSON array of connections.
pub fn load_connections(path: impl AsRef<Path>) -> Result<Vec<Connection>, ContentStoreError> {
    read_json(path.as_ref())
}
