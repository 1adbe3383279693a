//! JSONL file writer for stream events.
//!
//! Each [`StreamEvent`] is written as one JSON line
//! `{"type", "timestamp", "data"}` before being forwarded to the wrapped sink.

use async_trait::async_trait;
use draftsmith_application::{EventSink, SinkClosed};
use draftsmith_domain::StreamEvent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Event sink decorator that appends every event to a JSONL file.
///
/// Write failures are logged and never stop the forwarded stream.
pub struct JsonlEventLogger<S> {
    inner: S,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl<S: EventSink> JsonlEventLogger<S> {
    /// Create a logger writing to `path` in front of `inner`.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    pub fn new(path: impl AsRef<Path>, inner: S) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;

        Ok(Self {
            inner,
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &StreamEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let data = serde_json::to_value(event)
            .ok()
            .and_then(|mut value| value.get_mut("data").map(serde_json::Value::take))
            .unwrap_or(serde_json::Value::Null);

        serde_json::json!({
            "type": event.name(),
            "timestamp": timestamp,
            "data": data,
        })
    }

    fn write(&self, event: &StreamEvent) {
        let line = match serde_json::to_string(&Self::record(event)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event.name(), e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not write event log {}: {}", self.path.display(), e);
        }
    }
}

#[async_trait]
impl<S: EventSink> EventSink for JsonlEventLogger<S> {
    async fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        self.write(&event);
        self.inner.send(event).await
    }
}

impl<S> Drop for JsonlEventLogger<S> {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_application::{BufferedEventSink, NoEvents};
    use draftsmith_domain::StatusLabel;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("run.events.jsonl");
        let logger = JsonlEventLogger::new(&path, NoEvents).unwrap();

        logger.send(StreamEvent::planning()).await.unwrap();
        logger
            .send(StreamEvent::stage_status(StatusLabel::Writing, 2, 2))
            .await
            .unwrap();
        logger
            .send(StreamEvent::Chunk {
                text: "Hello".to_string(),
            })
            .await
            .unwrap();
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line["timestamp"].is_string()));
        assert_eq!(lines[0]["type"], "status");
        assert_eq!(lines[1]["data"]["label"], "writing");
        assert_eq!(lines[2]["type"], "chunk");
        assert_eq!(lines[2]["data"]["text"], "Hello");
    }

    #[tokio::test]
    async fn test_forwards_to_inner_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forward.jsonl");
        let logger = JsonlEventLogger::new(&path, BufferedEventSink::default()).unwrap();

        logger
            .send(StreamEvent::error("boom", None))
            .await
            .unwrap();

        assert_eq!(logger.inner.names(), vec!["error"]);
        assert_eq!(read_lines(&path)[0]["data"]["message"], "boom");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlEventLogger::new(blocker.join("events.jsonl"), NoEvents).is_err());
    }
}
