//! Content entities

use serde::{Deserialize, Serialize};

/// A content item selected by the user (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedContent {
    pub content_id: i64,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
}

impl SelectedContent {
    pub fn new(content_id: i64, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            content_id,
            title: title.into(),
            summary: summary.into(),
            full_content: None,
        }
    }

    pub fn with_full_content(mut self, full_content: impl Into<String>) -> Self {
        self.full_content = Some(full_content.into());
        self
    }

    /// Text handed to agents: the full body when available, otherwise the
    /// stored summary.
    pub fn body(&self) -> &str {
        match self.full_content.as_deref() {
            Some(full) if !full.trim().is_empty() => full,
            _ => &self.summary,
        }
    }
}

/// Relation between two selected items (e.g. an edge on a board)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from_content_id: i64,
    pub to_content_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Connection {
    pub fn new(from_content_id: i64, to_content_id: i64) -> Self {
        Self {
            from_content_id,
            to_content_id,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Token accounting for one selected item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedContent {
    pub content_id: i64,
    pub tokens_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_prefers_full_content() {
        let content = SelectedContent::new(1, "Title", "short").with_full_content("long body");
        assert_eq!(content.body(), "long body");
    }

    #[test]
    fn test_body_falls_back_to_summary() {
        let content = SelectedContent::new(1, "Title", "short").with_full_content("   ");
        assert_eq!(content.body(), "short");
        assert_eq!(SelectedContent::new(2, "T", "s").body(), "s");
    }

    #[test]
    fn test_deserialize_without_full_content() {
        let json = r#"{"content_id": 7, "title": "A", "summary": "B"}"#;
        let content: SelectedContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.content_id, 7);
        assert!(content.full_content.is_none());
    }
}
