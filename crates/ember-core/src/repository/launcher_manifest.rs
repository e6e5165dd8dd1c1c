use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::manifest::VersionType;

/// Remote version catalog.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct LauncherManifest {
    #[serde(default)]
    pub latest: Latest,
    pub versions: Vec<ManifestVersion>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Latest {
    pub release: String,
    pub snapshot: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManifestVersion {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub url: String,
    pub release_time: DateTime<Utc>,
}

impl LauncherManifest {
    pub fn find_version(&self, id: &str) -> Option<&ManifestVersion> {
        self.versions.iter().find(|v| v.id == id)
    }
}
