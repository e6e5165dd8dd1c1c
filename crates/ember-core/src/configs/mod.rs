use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    downloads::{FileDownloader, RetryPolicy},
    fs::{read_toml_config, write_toml_config},
    game_paths::GamePaths,
    instance::Launcher,
    repository::{catalog::VersionCatalog, java_runner::JavaRunner},
    DEFAULT_DATA_DIR, LAUNCHER_MANIFEST, RESOURCES_URL,
};

/// `Ember.toml`, every key is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    pub data_dir: PathBuf,
    /// Java executable, discovered through `JAVA_HOME` and `PATH` when absent.
    pub java: Option<PathBuf>,
    pub manifest_url: String,
    pub resources_url: String,
    /// Attempts per download.
    pub retries: u32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            java: None,
            manifest_url: LAUNCHER_MANIFEST.to_owned(),
            resources_url: RESOURCES_URL.to_owned(),
            retries: RetryPolicy::default().attempts,
        }
    }
}

impl LauncherConfig {
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        read_toml_config(path).await
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    pub async fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if tokio::fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::debug!("{} does not exist, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        write_toml_config(self, path).await
    }

    pub fn java_runner(&self) -> JavaRunner {
        self.java
            .clone()
            .map_or_else(JavaRunner::from_environment, JavaRunner::path)
    }

    /// Builds a [`Launcher`] rooted at the absolute form of `data_dir`.
    pub fn launcher(&self) -> std::io::Result<Launcher> {
        let paths = GamePaths::new(&self.data_dir).make_absolute()?;
        let files = FileDownloader::new().retry(RetryPolicy::default().attempts(self.retries));
        let catalog = VersionCatalog::new(files.client().clone(), &self.manifest_url, &paths.versions);

        Ok(Launcher::builder()
            .paths(paths)
            .catalog(catalog)
            .files(files)
            .java(self.java_runner())
            .resources_url(&self.resources_url)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: LauncherConfig = toml::from_str(r#"data_dir = "/games/ember""#).unwrap();

        assert_eq!(config.data_dir, Path::new("/games/ember"));
        assert_eq!(config.manifest_url, LAUNCHER_MANIFEST);
        assert_eq!(config.resources_url, RESOURCES_URL);
        assert_eq!(config.retries, 3);
        assert_eq!(config.java, None);
    }

    #[tokio::test]
    async fn saved_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ember.toml");

        let config = LauncherConfig {
            java: Some(PathBuf::from("/opt/java/bin/java")),
            retries: 5,
            ..LauncherConfig::default()
        };
        config.save(&path).await.unwrap();

        assert_eq!(LauncherConfig::load(&path).await.unwrap(), config);
        assert_eq!(config.java_runner(), JavaRunner::Path("/opt/java/bin/java".into()));
    }

    #[tokio::test]
    async fn absent_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LauncherConfig::load_or_default(dir.path().join("Ember.toml")).await.unwrap();

        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn launcher_paths_are_absolute() {
        let launcher = LauncherConfig::default().launcher().unwrap();

        assert!(launcher.paths().game.is_absolute());
        assert!(launcher.paths().versions.ends_with("versions"));
        assert_eq!(launcher.catalog().url(), LAUNCHER_MANIFEST);
    }
}
