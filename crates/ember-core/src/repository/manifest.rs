use std::{collections::HashMap, fmt::Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// A version JSON as stored in `versions/<id>/<id>.json`, before inheritance is applied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    pub id: String,
    #[serde(rename = "type", default)]
    pub version_type: VersionType,
    pub release_time: Option<DateTime<Utc>>,
    pub inherits_from: Option<String>,
    pub main_class: Option<String>,
    pub asset_index: Option<AssetIndex>,
    /// Legacy asset index name, present on old versions without `assetIndex`.
    pub assets: Option<String>,
    #[serde(default)]
    pub libraries: Vec<Library>,
    pub arguments: Option<Arguments>,
    pub minecraft_arguments: Option<String>,
    pub downloads: Option<Downloads>,
}

#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    #[default]
    Local,
    Other(String),
}

impl VersionType {
    pub fn as_str(&self) -> &str {
        match self {
            VersionType::Release => "release",
            VersionType::Snapshot => "snapshot",
            VersionType::OldBeta => "old_beta",
            VersionType::OldAlpha => "old_alpha",
            VersionType::Local => "local",
            VersionType::Other(other) => other,
        }
    }
}

impl From<String> for VersionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "release" => Self::Release,
            "snapshot" => Self::Snapshot,
            "old_beta" => Self::OldBeta,
            "old_alpha" => Self::OldAlpha,
            "local" => Self::Local,
            _ => Self::Other(value),
        }
    }
}

impl From<VersionType> for String {
    fn from(value: VersionType) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for VersionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Argument {
    Conditional { rules: Vec<Rule>, value: Value },
    Plain(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Array(Vec<String>),
}

impl Value {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Value::String(s) => std::slice::from_ref(s),
            Value::Array(arr) => arr,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Rule {
    pub action: Action,
    pub os: Option<Os>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Allow,
    Disallow,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Os {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndex {
    pub id: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Downloads {
    pub client: Option<DownloadFile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DownloadFile {
    pub path: Option<String>,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Library {
    pub name: Option<String>,
    pub downloads: Option<LibraryDownloads>,
    /// OS name -> classifier key, the key may contain `${arch}`.
    pub natives: Option<HashMap<String, String>>,
    pub rules: Option<Vec<Rule>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LibraryDownloads {
    pub artifact: Option<DownloadFile>,
    pub classifiers: Option<HashMap<String, DownloadFile>>,
}

impl Library {
    /// The main jar of the library, if it has a concrete storage path.
    pub fn artifact(&self) -> Option<(&str, &str)> {
        let artifact = self.downloads.as_ref()?.artifact.as_ref()?;
        Some((artifact.url.as_str(), artifact.path.as_deref()?))
    }

    /// Classifier key for `platform`, with `${arch}` substituted.
    pub fn native_key(&self, platform: &Platform) -> Option<String> {
        self.natives
            .as_ref()?
            .get(platform.os.as_str())
            .map(|key| key.replace("${arch}", &platform.arch))
    }

    /// The native archive for `platform`, if the library ships one.
    pub fn native_classifier(&self, platform: &Platform) -> Option<(&str, &str)> {
        let key = self.native_key(platform)?;
        let file = self.downloads.as_ref()?.classifiers.as_ref()?.get(&key)?;
        Some((file.url.as_str(), file.path.as_deref()?))
    }
}
