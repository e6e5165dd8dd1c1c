pub use downloaders::*;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use futures_util::stream::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::{
    events::{EventSink, LauncherEvent},
    EMBER_NAME, EMBER_VERSION,
};

use self::progress::ProgressSampler;

pub mod downloaders;
pub mod progress;
pub mod traits;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to write {url} into {path}: {source}")]
    Io {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How many times a failed transfer is attempted and how long to wait in between.
///
/// The delay doubles after every failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Idempotent streaming downloader shared by every acquisition step.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: Client,
    retry: RetryPolicy,
}

impl Default for FileDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDownloader {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(format!("{EMBER_NAME}/{EMBER_VERSION}"))
            .build()
            .unwrap_or_default();

        Self::with_client(client)
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` into `path` unless `path` already exists.
    ///
    /// Existence is the only check, a present file is never re-validated. The body
    /// is streamed into `<path>.part` and moved into place once complete, so an
    /// interrupted transfer never leaves a file behind at `path`.
    pub async fn fetch(
        &self,
        url: &str,
        path: impl AsRef<Path>,
        progress: Option<&dyn EventSink>,
    ) -> Result<(), DownloadError> {
        let path = path.as_ref();

        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            debug!("Skipping {}, already present", path.display());
            return Ok(());
        }

        let mut delay = self.retry.delay;
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(url, path, progress).await {
                Ok(()) => {
                    debug!("Downloaded successfully {}", path.display());
                    return Ok(());
                }
                Err(err) if attempt < attempts => {
                    warn!("Downloading attempt {attempt}/{attempts} of {url} failed. Retrying. Error: {err}");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    error!("All {attempts} attempts to download {url} failed");
                    return Err(err);
                }
            }
        }
    }

    async fn fetch_once(
        &self,
        url: &str,
        path: &Path,
        progress: Option<&dyn EventSink>,
    ) -> Result<(), DownloadError> {
        let io_error = |source| DownloadError::Io {
            url: url.to_owned(),
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let part = part_path(path);
        let result = async {
            let mut sampler = ProgressSampler::new(response.content_length(), Instant::now());
            let mut file = tokio::fs::File::create(&part).await.map_err(io_error)?;
            let mut stream = response.bytes_stream();

            while let Some(item) = stream.next().await {
                let chunk = item.map_err(|source| DownloadError::Request {
                    url: url.to_owned(),
                    source,
                })?;

                file.write_all(&chunk).await.map_err(io_error)?;

                if let Some(sink) = progress {
                    if let Some(sample) = sampler.advance(chunk.len() as u64, Instant::now()) {
                        sink.emit(LauncherEvent::Progress(sample)).await;
                    }
                }
            }

            file.flush().await.map_err(io_error)?;
            drop(file);

            if let Some(sink) = progress {
                if let Some(sample) = sampler.finish(Instant::now()) {
                    sink.emit(LauncherEvent::Progress(sample)).await;
                }
            }

            tokio::fs::rename(&part, path).await.map_err(io_error)
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&part).await;
        }

        result
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
