use std::{
    fmt::Display,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    downloads::{traits::Downloader, FileDownloader},
    error::{Error, Result},
    events::EventSink,
    game_paths::GamePaths,
    instance::launch::rules::is_library_allowed,
    platform::Platform,
    repository::manifest::Library,
};

/// Fetches native classifier archives and unpacks them into a per-version directory.
///
/// The target directory is wiped first, so it only ever holds the natives of
/// the current launch.
#[derive(Debug)]
pub struct NativesExtractor<'a> {
    files: &'a FileDownloader,
    paths: &'a GamePaths,
    libraries: &'a [Library],
    platform: &'a Platform,
    target: PathBuf,
}

impl<'a> NativesExtractor<'a> {
    pub fn new(
        files: &'a FileDownloader,
        paths: &'a GamePaths,
        libraries: &'a [Library],
        platform: &'a Platform,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            files,
            paths,
            libraries,
            platform,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    async fn reset_target(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.target).await {
            Err(err) if err.kind() != ErrorKind::NotFound => return Err(Error::io(&self.target)(err)),
            _ => {}
        }

        tokio::fs::create_dir_all(&self.target)
            .await
            .map_err(Error::io(&self.target))
    }
}

#[async_trait::async_trait]
impl Downloader for NativesExtractor<'_> {
    fn status(&self) -> String {
        "Extracting natives".to_owned()
    }

    #[tracing::instrument(skip_all)]
    async fn download(&self, _sink: &dyn EventSink) -> Result<()> {
        self.reset_target().await?;

        let mut extracted = 0;

        for library in self.libraries {
            if library.natives.is_none() || !is_library_allowed(library, self.platform.os) {
                continue;
            }

            let Some((url, path)) = library.native_classifier(self.platform) else {
                debug!(
                    "{} has no natives for {}",
                    library.name.as_deref().unwrap_or("library"),
                    self.platform.os
                );
                continue;
            };

            let archive = self.paths.library(path);
            self.files.fetch(url, &archive, None).await?;
            extract(archive, self.target.clone()).await?;
            extracted += 1;
        }

        info!("Extracted {extracted} native archives into {}", self.target.display());

        Ok(())
    }
}

/// Unpacks the whole `archive` into `target`, overwriting existing files.
pub async fn extract(archive: PathBuf, target: PathBuf) -> Result<()> {
    let (archive_path, target_path) = (archive.clone(), target.clone());

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive).map_err(|err| extraction_error(&archive, &target, err))?;
        let mut zip = zip::ZipArchive::new(file).map_err(|err| extraction_error(&archive, &target, err))?;

        zip.extract(&target)
            .map_err(|err| extraction_error(&archive, &target, err))
    })
    .await
    .map_err(|err| extraction_error(&archive_path, &target_path, err))?
}

fn extraction_error(archive: &Path, target: &Path, error: impl Display) -> Error {
    Error::Extraction {
        archive: archive.to_path_buf(),
        target: target.to_path_buf(),
        error: error.to_string(),
    }
}
