use std::path::PathBuf;

use itertools::Itertools;

use crate::downloads::DownloadError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to fetch the version manifest from {url}: {source}")]
    ManifestFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No such version: {0}")]
    VersionNotFound(String),

    #[error("Cyclic `inheritsFrom` chain: {}", .0.iter().join(" -> "))]
    CyclicInheritance(Vec<String>),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Unable to extract {archive} into {target}: {error}")]
    Extraction {
        archive: PathBuf,
        target: PathBuf,
        error: String,
    },

    #[error("Unable to spawn `{executable}`: {source}")]
    LaunchSpawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Version {0} does not declare a client download")]
    MissingClientDownload(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
