use super::{MediaSource, Subscription};
use crate::app::events::{Event, MediaEvent};
use crate::lyrics::TrackQuery;
use anyhow::Context;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    sync::mpsc,
};

/// Properties observed over IPC, keyed by observer id.
const OBSERVED: [(u64, &str); 3] = [(1, "media-title"), (2, "metadata"), (3, "time-pos")];

/// Follows a running mpv through its JSON IPC socket.
#[derive(Debug, Clone)]
pub struct MpvSource {
    socket_path: PathBuf,
}

impl MpvSource {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }
}

impl MediaSource for MpvSource {
    async fn subscribe(self, event_tx: mpsc::Sender<Event>) -> anyhow::Result<Subscription> {
        let stream = connect_with_retry(&self.socket_path).await?;
        let (reader, mut writer) = tokio::io::split(stream);

        for (id, name) in OBSERVED {
            let mut line = serde_json::to_vec(&json!({"command": ["observe_property", id, name]}))
                .context("encode mpv json")?;
            line.push(b'\n');
            writer.write_all(&line).await.context("write mpv ipc")?;
        }
        writer.flush().await.context("flush mpv ipc")?;
        tracing::info!(socket = %self.socket_path.display(), "following mpv");

        let task = tokio::spawn(async move {
            // Keep the write half alive for as long as we read.
            let _writer = writer;
            read_events_loop(reader, event_tx).await;
        });
        Ok(Subscription::new(task))
    }
}

async fn connect_with_retry(path: &Path) -> anyhow::Result<UnixStream> {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) => {
                if tokio::time::Instant::now() > deadline {
                    return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
                }
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
        }
    }
}

async fn read_events_loop(reader: tokio::io::ReadHalf<UnixStream>, event_tx: mpsc::Sender<Event>) {
    let mut tracker = TrackTracker::default();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            tracing::debug!(%line, "ignoring non-json mpv line");
            continue;
        };
        if let Some(err) = v.get("error").and_then(|e| e.as_str())
            && err != "success"
        {
            tracing::warn!("mpv ipc error: {err}");
        }
        if let Some(me) = tracker.apply(&v)
            && event_tx.send(Event::Media(me)).await.is_err()
        {
            return;
        }
    }
    tracing::info!("mpv ipc closed");
    let _ = event_tx.send(Event::Media(MediaEvent::Ended)).await;
}

/// Folds mpv property changes into track-change and position events.
#[derive(Debug, Default)]
struct TrackTracker {
    media_title: Option<String>,
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
    current: Option<TrackQuery>,
}

impl TrackTracker {
    fn apply(&mut self, v: &serde_json::Value) -> Option<MediaEvent> {
        if v.get("event")?.as_str()? != "property-change" {
            return None;
        }
        let data = v.get("data");
        match v.get("name")?.as_str()? {
            "time-pos" => {
                let secs = data?.as_f64()?;
                Some(MediaEvent::Position {
                    position_ms: (secs.max(0.0) * 1000.0) as u64,
                })
            }
            "media-title" => {
                self.media_title = data.and_then(|d| d.as_str()).map(str::to_string);
                self.track_change()
            }
            "metadata" => {
                self.metadata = data.and_then(|d| d.as_object()).cloned();
                self.track_change()
            }
            _ => None,
        }
    }

    fn track_change(&mut self) -> Option<MediaEvent> {
        // mpv reports metadata as unavailable between files and as an object
        // (possibly empty) once one is loaded. Until then the artist is unknown.
        self.metadata.as_ref()?;
        let query = self.query()?;
        if self.current.as_ref() == Some(&query) {
            return None;
        }
        self.current = Some(query.clone());
        Some(MediaEvent::TrackChanged(query))
    }

    fn query(&self) -> Option<TrackQuery> {
        let title = self
            .metadata_field("title")
            .or(self.media_title.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())?;
        let artist = self.metadata_field("artist").unwrap_or("").trim();
        Some(TrackQuery::new(title, artist))
    }

    /// mpv passes tags through as found in the file, so key case varies.
    fn metadata_field(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_str())
    }
}
