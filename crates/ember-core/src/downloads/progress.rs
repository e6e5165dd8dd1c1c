use std::time::{Duration, Instant};

use crate::events::DownloadProgress;

/// Turns a stream of received chunks into throttled progress samples.
#[derive(Debug)]
pub struct ProgressSampler {
    total: Option<u64>,
    downloaded: u64,
    last_time: Instant,
    last_downloaded: u64,
}

impl ProgressSampler {
    pub const INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(total: Option<u64>, now: Instant) -> Self {
        Self {
            total,
            downloaded: 0,
            last_time: now,
            last_downloaded: 0,
        }
    }

    /// Records `bytes` more bytes. Returns a sample once at least [`Self::INTERVAL`]
    /// has passed since the previous one, or when the transfer is complete.
    pub fn advance(&mut self, bytes: u64, now: Instant) -> Option<DownloadProgress> {
        self.downloaded += bytes;

        let complete = self.total == Some(self.downloaded);
        if now.duration_since(self.last_time) < Self::INTERVAL && !complete {
            return None;
        }

        Some(self.sample(now))
    }

    /// Forces a final sample when bytes arrived after the last one.
    pub fn finish(&mut self, now: Instant) -> Option<DownloadProgress> {
        (self.downloaded > self.last_downloaded).then(|| self.sample(now))
    }

    fn sample(&mut self, now: Instant) -> DownloadProgress {
        let elapsed = now.duration_since(self.last_time).as_secs_f64();
        let since_last = self.downloaded - self.last_downloaded;

        let speed = if elapsed > 0.0 { since_last as f64 / elapsed } else { 0.0 };

        let percentage = self
            .total
            .filter(|total| *total > 0)
            .map(|total| self.downloaded as f64 / total as f64 * 100.0);

        let eta = self
            .total
            .filter(|_| speed > 0.0)
            .map(|total| total.saturating_sub(self.downloaded) as f64 / speed);

        self.last_time = now;
        self.last_downloaded = self.downloaded;

        DownloadProgress {
            percentage,
            speed,
            eta,
            downloaded: self.downloaded,
            total: self.total,
        }
    }
}
