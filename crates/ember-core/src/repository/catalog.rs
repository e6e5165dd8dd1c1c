use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    fs::read_json,
};

use super::{
    launcher_manifest::{LauncherManifest, ManifestVersion},
    manifest::VersionType,
};

/// One entry of a version listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub release_time: DateTime<Utc>,
    /// Manifest URL, `None` for versions that only exist locally.
    pub url: Option<String>,
}

impl From<&ManifestVersion> for VersionSummary {
    fn from(value: &ManifestVersion) -> Self {
        Self {
            id: value.id.clone(),
            version_type: value.version_type.clone(),
            release_time: value.release_time,
            url: Some(value.url.clone()),
        }
    }
}

/// Just the fields a listing needs from a locally installed version JSON.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct LocalVersion {
    #[serde(rename = "type", default)]
    version_type: VersionType,
    release_time: Option<DateTime<Utc>>,
}

/// The remote version catalog together with the locally installed versions.
///
/// The remote document is requested at most once per catalog.
#[derive(Debug)]
pub struct VersionCatalog {
    client: Client,
    url: String,
    versions_dir: PathBuf,
    remote: OnceCell<LauncherManifest>,
}

impl VersionCatalog {
    pub fn new(client: Client, url: impl Into<String>, versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            url: url.into(),
            versions_dir: versions_dir.into(),
            remote: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn remote(&self) -> Result<&LauncherManifest> {
        self.remote.get_or_try_init(|| self.fetch_remote()).await
    }

    async fn fetch_remote(&self) -> Result<LauncherManifest> {
        debug!("Calling Launcher Manifest at {}", self.url);

        let fetch_error = |source| Error::ManifestFetch {
            url: self.url.clone(),
            source,
        };

        self.client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?
            .json::<LauncherManifest>()
            .await
            .map_err(fetch_error)
    }

    /// Looks `id` up in the remote catalog.
    pub async fn find(&self, id: &str) -> Result<&ManifestVersion> {
        self.remote()
            .await?
            .find_version(id)
            .ok_or_else(|| Error::VersionNotFound(id.to_owned()))
    }

    /// Remote versions plus every locally installed version the remote catalog
    /// does not know about, newest first.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn list_versions(&self) -> Result<Vec<VersionSummary>> {
        let remote = self.remote().await?;

        let known = remote.versions.iter().map(|v| v.id.as_str()).collect::<HashSet<_>>();

        let mut versions = remote.versions.iter().map(VersionSummary::from).collect_vec();
        versions.extend(scan_local(&self.versions_dir, &known).await);
        versions.sort_by(|a, b| b.release_time.cmp(&a.release_time));

        debug!("Listed {} versions", versions.len());

        Ok(versions)
    }
}

/// Versions installed under `versions_dir` that are absent from `known`.
///
/// A directory only counts when it holds `<id>/<id>.json`.
async fn scan_local(versions_dir: &Path, known: &HashSet<&str>) -> Vec<VersionSummary> {
    let mut entries = match tokio::fs::read_dir(versions_dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!("Unable to scan {}: {err}", versions_dir.display());
            return Vec::new();
        }
    };

    let mut local = Vec::new();

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                warn!("Unable to scan {}: {err}", versions_dir.display());
                break;
            }
        };

        let is_dir = entry.file_type().await.is_ok_and(|ty| ty.is_dir());
        let Some(id) = entry.file_name().to_str().map(ToOwned::to_owned) else {
            continue;
        };

        if !is_dir || known.contains(id.as_str()) {
            continue;
        }

        let json = entry.path().join(format!("{id}.json"));
        if !tokio::fs::try_exists(&json).await.unwrap_or(false) {
            continue;
        }

        let version = read_json::<LocalVersion>(&json).await.unwrap_or_else(|err| {
            warn!("Listing {id} with defaults: {err}");
            LocalVersion::default()
        });

        local.push(VersionSummary {
            id,
            version_type: version.version_type,
            release_time: version.release_time.unwrap_or_default(),
            url: None,
        });
    }

    local.sort_by(|a, b| a.id.cmp(&b.id));
    local
}
