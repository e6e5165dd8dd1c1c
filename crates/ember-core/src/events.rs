use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

/// Byte-level progress of a single transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadProgress {
    /// `None` when the server did not report a content length.
    pub percentage: Option<f64>,
    /// Bytes per second since the previous sample.
    pub speed: f64,
    /// Seconds left, `None` while the speed is zero or the total is unknown.
    pub eta: Option<f64>,
    pub downloaded: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum LauncherEvent {
    Status(String),
    Log(String),
    Progress(DownloadProgress),
    Assets { downloaded: usize, total: usize },
    Failed(String),
    GameClosed { code: Option<i32> },
}

#[async_trait::async_trait]
pub trait EventSink: Sync + Send {
    /// Delivery is best effort, a gone receiver is ignored.
    async fn emit(&self, event: LauncherEvent);
}

pub type SharedSink = Arc<dyn EventSink>;

#[async_trait::async_trait]
impl EventSink for tokio::sync::mpsc::Sender<LauncherEvent> {
    async fn emit(&self, event: LauncherEvent) {
        let _ = self.send(event).await;
    }
}

#[async_trait::async_trait]
impl EventSink for tokio::sync::mpsc::UnboundedSender<LauncherEvent> {
    async fn emit(&self, event: LauncherEvent) {
        let _ = self.send(event);
    }
}

#[async_trait::async_trait]
impl EventSink for std::sync::mpsc::Sender<LauncherEvent> {
    async fn emit(&self, event: LauncherEvent) {
        let _ = self.send(event);
    }
}

/// `EventSink` that does nothing with provided events.
pub struct IgnoreEvents;

#[async_trait::async_trait]
impl EventSink for IgnoreEvents {
    async fn emit(&self, _event: LauncherEvent) {}
}

/// `EventSink` that writes events into `tracing`.
pub struct TracingEvents;

#[async_trait::async_trait]
impl EventSink for TracingEvents {
    async fn emit(&self, event: LauncherEvent) {
        match event {
            LauncherEvent::Status(status) => info!(target: "ember::status", "{status}"),
            LauncherEvent::Log(line) => info!(target: "ember::log", "{line}"),
            LauncherEvent::Progress(progress) => info!(
                target: "ember::progress",
                downloaded = progress.downloaded,
                total = progress.total,
                speed = progress.speed,
                eta = progress.eta,
                "{:.1}%",
                progress.percentage.unwrap_or_default()
            ),
            LauncherEvent::Assets { downloaded, total } => {
                info!(target: "ember::progress", "Assets {downloaded}/{total}");
            }
            LauncherEvent::Failed(message) => error!(target: "ember::status", "{message}"),
            LauncherEvent::GameClosed { code } => {
                info!(target: "ember::status", "Game closed with code {code:?}");
            }
        }
    }
}
