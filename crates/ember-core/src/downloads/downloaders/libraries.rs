use tracing::{debug, info};

use crate::{
    downloads::{traits::Downloader, FileDownloader},
    error::Result,
    events::EventSink,
    game_paths::GamePaths,
    instance::launch::rules::is_library_allowed,
    platform::OsName,
    repository::manifest::Library,
};

/// Fetches the main jar of every library enabled on `os`, one after another.
#[derive(Debug)]
pub struct LibrariesDownloader<'a> {
    files: &'a FileDownloader,
    paths: &'a GamePaths,
    libraries: &'a [Library],
    os: OsName,
}

impl<'a> LibrariesDownloader<'a> {
    pub fn new(files: &'a FileDownloader, paths: &'a GamePaths, libraries: &'a [Library], os: OsName) -> Self {
        Self {
            files,
            paths,
            libraries,
            os,
        }
    }

    /// `(url, relative path)` of every artifact this downloader will fetch.
    pub fn artifacts(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.libraries
            .iter()
            .filter(|library| is_library_allowed(library, self.os))
            .filter_map(Library::artifact)
    }
}

#[async_trait::async_trait]
impl Downloader for LibrariesDownloader<'_> {
    fn status(&self) -> String {
        "Downloading libraries".to_owned()
    }

    #[tracing::instrument(skip_all)]
    async fn download(&self, _sink: &dyn EventSink) -> Result<()> {
        let mut count = 0;

        for (url, path) in self.artifacts() {
            debug!("Library {path}");
            self.files.fetch(url, self.paths.library(path), None).await?;
            count += 1;
        }

        info!("Finished downloading {count} libraries");

        Ok(())
    }
}
