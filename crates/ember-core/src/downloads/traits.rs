use crate::{
    error::Result,
    events::{EventSink, LauncherEvent},
};

/// One acquisition phase of a launch (client jar, libraries, natives, assets).
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Human readable description reported before the phase starts.
    fn status(&self) -> String;

    async fn download(&self, sink: &dyn EventSink) -> Result<()>;
}

/// Runs downloaders one after another, stopping at the first failure.
#[derive(Default)]
pub struct DownloadQueue<'a> {
    queue: Vec<Box<dyn Downloader + 'a>>,
}

impl<'a> DownloadQueue<'a> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    #[must_use]
    pub fn with_downloader<D>(mut self, downloader: D) -> Self
    where
        D: Downloader + 'a,
    {
        self.queue.push(Box::new(downloader));
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub async fn download(self, sink: &dyn EventSink) -> Result<()> {
        for downloader in self.queue {
            sink.emit(LauncherEvent::Status(downloader.status())).await;
            downloader.download(sink).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::error::Error;

    use super::*;

    struct Step<'a> {
        name: &'static str,
        fail: bool,
        log: &'a Mutex<Vec<&'static str>>,
    }

    #[async_trait::async_trait]
    impl Downloader for Step<'_> {
        fn status(&self) -> String {
            self.name.to_owned()
        }

        async fn download(&self, _sink: &dyn EventSink) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(Error::VersionNotFound(self.name.to_owned()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn queue_runs_in_order_and_stops_on_failure() {
        let log = Mutex::new(Vec::new());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let queue = DownloadQueue::new()
            .with_downloader(Step { name: "first", fail: false, log: &log })
            .with_downloader(Step { name: "second", fail: true, log: &log })
            .with_downloader(Step { name: "third", fail: false, log: &log });
        assert_eq!(queue.len(), 3);

        assert!(queue.download(&tx).await.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);

        drop(tx);
        let mut statuses = Vec::new();
        while let Some(LauncherEvent::Status(status)) = rx.recv().await {
            statuses.push(status);
        }
        assert_eq!(statuses, vec!["first", "second"]);
    }
}
