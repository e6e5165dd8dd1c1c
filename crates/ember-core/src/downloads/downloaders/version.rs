use std::path::PathBuf;

use tracing::info;

use crate::{
    downloads::{traits::Downloader, FileDownloader},
    error::{Error, Result},
    events::EventSink,
    game_paths::GamePaths,
    repository::resolve::VersionDescriptor,
};

/// Fetches the client jar of the chain root into `versions/<jarId>/<jarId>.jar`.
#[derive(Debug)]
pub struct ClientDownloader<'a> {
    files: &'a FileDownloader,
    jar_id: &'a str,
    url: Option<&'a str>,
    jar: PathBuf,
}

impl<'a> ClientDownloader<'a> {
    pub fn new(files: &'a FileDownloader, paths: &GamePaths, descriptor: &'a VersionDescriptor) -> Self {
        Self {
            files,
            jar_id: &descriptor.jar_id,
            url: descriptor.client_url(),
            jar: paths.version_jar(&descriptor.jar_id),
        }
    }

    pub fn jar(&self) -> &PathBuf {
        &self.jar
    }
}

#[async_trait::async_trait]
impl Downloader for ClientDownloader<'_> {
    fn status(&self) -> String {
        format!("Downloading client {}", self.jar_id)
    }

    #[tracing::instrument(skip_all)]
    async fn download(&self, sink: &dyn EventSink) -> Result<()> {
        let Some(url) = self.url else {
            // A manually installed jar needs no download entry.
            if tokio::fs::try_exists(&self.jar).await.unwrap_or(false) {
                return Ok(());
            }
            return Err(Error::MissingClientDownload(self.jar_id.to_owned()));
        };

        self.files.fetch(url, &self.jar, Some(sink)).await?;

        info!("Client jar {} is ready", self.jar.display());

        Ok(())
    }
}
