//! Optional per-channel audit log.
//!
//! Each configured destination gets a writer task fed through a bounded
//! queue. Recording is fire-and-forget: a full queue, an unopenable file or
//! a failed write is logged and otherwise ignored, so auditing can never
//! slow down or break relaying.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{ChannelName, Payload};

#[derive(Debug)]
struct AuditRecord {
    at: DateTime<Utc>,
    payload: Payload,
}

/// Handle for appending received messages to per-channel log files.
///
/// Cheap to clone; channels without a destination are skipped.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    writers: Arc<HashMap<ChannelName, mpsc::Sender<AuditRecord>>>,
}

impl AuditLog {
    /// Returns an audit log with no destinations.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Spawns one writer task per `(channel, path)` destination.
    ///
    /// Each writer buffers up to `buffer` records. Must be called from
    /// within a Tokio runtime.
    pub fn open<I>(destinations: I, buffer: usize) -> Self
    where
        I: IntoIterator<Item = (ChannelName, PathBuf)>,
    {
        let mut writers = HashMap::new();
        for (channel, path) in destinations {
            let (tx, rx) = mpsc::channel(buffer.max(1));
            tracing::info!(channel = %channel, path = %path.display(), "audit log enabled");
            tokio::spawn(write_records(channel.clone(), path, rx));
            writers.insert(channel, tx);
        }
        Self {
            writers: Arc::new(writers),
        }
    }

    /// Returns `true` if `channel` has an audit destination.
    #[must_use]
    pub fn is_enabled(&self, channel: &ChannelName) -> bool {
        self.writers.contains_key(channel)
    }

    /// Notes that `payload` was received on `channel`.
    ///
    /// Never blocks. Records are dropped with a warning when the writer
    /// falls behind.
    pub fn record(&self, channel: &ChannelName, payload: &Payload) {
        let Some(writer) = self.writers.get(channel) else {
            return;
        };
        let record = AuditRecord {
            at: Utc::now(),
            payload: payload.clone(),
        };
        match writer.try_send(record) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(channel = %channel, "audit log backlog full; record dropped");
            }
        }
    }
}

/// Formats one audit line: RFC 3339 timestamp, a space, the raw payload.
fn format_line(record: &AuditRecord) -> Vec<u8> {
    let stamp = record.at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut line = Vec::with_capacity(stamp.len() + record.payload.len() + 2);
    line.extend_from_slice(stamp.as_bytes());
    line.push(b' ');
    line.extend_from_slice(record.payload.as_bytes());
    line.push(b'\n');
    line
}

async fn open_append(path: &Path) -> std::io::Result<tokio::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    OpenOptions::new().create(true).append(true).open(path).await
}

async fn write_records(channel: ChannelName, path: PathBuf, mut rx: mpsc::Receiver<AuditRecord>) {
    let mut file = match open_append(&path).await {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(
                channel = %channel,
                path = %path.display(),
                error = %err,
                "cannot open audit log; auditing disabled for channel"
            );
            return;
        }
    };

    while let Some(record) = rx.recv().await {
        let line = format_line(&record);
        let written = match file.write_all(&line).await {
            Ok(()) => file.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            tracing::warn!(
                channel = %channel,
                path = %path.display(),
                error = %err,
                "audit log write failed"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn chat() -> ChannelName {
        let Ok(name) = ChannelName::new("/chat/") else {
            panic!("valid name");
        };
        name
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("channel-relay-{}", uuid::Uuid::new_v4()))
            .join("audit.log")
    }

    async fn read_lines(path: &Path, expected: usize) -> Vec<String> {
        for _ in 0..100 {
            if let Ok(contents) = tokio::fs::read_to_string(path).await {
                let lines: Vec<String> = contents.lines().map(str::to_string).collect();
                if lines.len() >= expected {
                    return lines;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("audit log never reached {expected} lines");
    }

    #[test]
    fn line_is_timestamp_then_payload() {
        let record = AuditRecord {
            at: Utc::now(),
            payload: Payload::text(r#"{"m":1}"#),
        };
        let line = String::from_utf8(format_line(&record)).unwrap_or_default();
        assert!(line.ends_with(" {\"m\":1}\n"));
        let Some((stamp, _)) = line.split_once(' ') else {
            panic!("space separator");
        };
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn records_are_appended_in_order() {
        let path = scratch_path();
        let audit = AuditLog::open([(chat(), path.clone())], 16);
        assert!(audit.is_enabled(&chat()));

        audit.record(&chat(), &Payload::text("first"));
        audit.record(&chat(), &Payload::text("second"));

        let lines = read_lines(&path, 2).await;
        assert!(lines.first().is_some_and(|l| l.ends_with(" first")));
        assert!(lines.get(1).is_some_and(|l| l.ends_with(" second")));

        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[test]
    fn disabled_log_ignores_records() {
        let audit = AuditLog::disabled();
        assert!(!audit.is_enabled(&chat()));
        audit.record(&chat(), &Payload::text("ignored"));
    }
}
