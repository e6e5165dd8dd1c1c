use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    downloads::FileDownloader,
    error::{Error, Result},
    events::EventSink,
    fs::read_json,
    game_paths::GamePaths,
};

use super::{
    catalog::VersionCatalog,
    manifest::{Arguments, AssetIndex, Downloads, Library, VersionManifest, VersionType},
};

/// A version with its whole `inheritsFrom` chain flattened into it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub id: String,
    /// Root of the inheritance chain, the version whose client jar is launched.
    pub jar_id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub release_time: Option<DateTime<Utc>>,
    pub main_class: Option<String>,
    pub asset_index: Option<AssetIndex>,
    pub assets: Option<String>,
    pub libraries: Vec<Library>,
    pub arguments: Option<Arguments>,
    pub minecraft_arguments: Option<String>,
    pub downloads: Option<Downloads>,
}

impl VersionDescriptor {
    fn root(id: String, manifest: VersionManifest) -> Self {
        Self {
            jar_id: id.clone(),
            id,
            version_type: manifest.version_type,
            release_time: manifest.release_time,
            main_class: manifest.main_class,
            asset_index: manifest.asset_index,
            assets: manifest.assets,
            libraries: manifest.libraries,
            arguments: manifest.arguments,
            minecraft_arguments: manifest.minecraft_arguments,
            downloads: manifest.downloads,
        }
    }

    /// Applies `child` on top of `self`, which acts as the parent.
    fn inherit(self, id: String, child: VersionManifest) -> Self {
        let mut libraries = self.libraries;
        libraries.extend(child.libraries);

        Self {
            id,
            jar_id: self.jar_id,
            version_type: child.version_type,
            release_time: child.release_time,
            main_class: child.main_class.or(self.main_class),
            asset_index: child.asset_index.or(self.asset_index),
            assets: child.assets.or(self.assets),
            libraries,
            arguments: merge_arguments(self.arguments, child.arguments),
            minecraft_arguments: child.minecraft_arguments.or(self.minecraft_arguments),
            downloads: self.downloads.or(child.downloads),
        }
    }

    /// Name of the asset index, falling back to the legacy `assets` field.
    pub fn asset_index_name(&self) -> &str {
        self.asset_index
            .as_ref()
            .map(|index| index.id.as_str())
            .or(self.assets.as_deref())
            .unwrap_or_default()
    }

    pub fn client_url(&self) -> Option<&str> {
        self.downloads
            .as_ref()?
            .client
            .as_ref()
            .map(|client| client.url.as_str())
    }
}

fn merge_arguments(parent: Option<Arguments>, child: Option<Arguments>) -> Option<Arguments> {
    match (parent, child) {
        (None, None) => None,
        (parent, child) => {
            let mut merged = parent.unwrap_or_default();
            let child = child.unwrap_or_default();

            merged.jvm.extend(child.jvm);
            merged.game.extend(child.game);

            Some(merged)
        }
    }
}

/// Loads version JSONs (downloading missing ones) and flattens inheritance chains.
#[derive(Clone, Copy)]
pub struct VersionResolver<'a> {
    catalog: &'a VersionCatalog,
    files: &'a FileDownloader,
    paths: &'a GamePaths,
    progress: Option<&'a dyn EventSink>,
}

impl<'a> VersionResolver<'a> {
    pub fn new(catalog: &'a VersionCatalog, files: &'a FileDownloader, paths: &'a GamePaths) -> Self {
        Self {
            catalog,
            files,
            paths,
            progress: None,
        }
    }

    /// Reports byte progress of version JSON downloads to `sink`.
    #[must_use]
    pub fn with_progress(mut self, sink: &'a dyn EventSink) -> Self {
        self.progress = Some(sink);
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, version_id: &str) -> Result<VersionDescriptor> {
        let mut chain: Vec<String> = Vec::new();
        let mut manifests = Vec::new();
        let mut next = Some(version_id.to_owned());

        while let Some(id) = next.take() {
            if chain.contains(&id) {
                chain.push(id);
                return Err(Error::CyclicInheritance(chain));
            }

            let manifest = self.load(&id).await?;
            next.clone_from(&manifest.inherits_from);

            chain.push(id);
            manifests.push(manifest);
        }

        // Chain and manifests are ordered child first, folding starts from the root.
        let mut levels = chain.into_iter().zip(manifests).rev();
        let Some((root_id, root)) = levels.next() else {
            return Err(Error::VersionNotFound(version_id.to_owned()));
        };

        let descriptor = levels.fold(VersionDescriptor::root(root_id, root), |parent, (id, child)| {
            parent.inherit(id, child)
        });

        info!("Resolved {} (client jar from {})", descriptor.id, descriptor.jar_id);

        Ok(descriptor)
    }

    /// Reads `versions/<id>/<id>.json`, fetching it through the catalog first
    /// when it is not installed.
    pub async fn load(&self, id: &str) -> Result<VersionManifest> {
        let path = self.paths.version_json(id);

        if !tokio::fs::try_exists(&path).await.map_err(Error::io(&path))? {
            let version = self.catalog.find(id).await?;
            debug!("Version {id} is not installed, fetching {}", version.url);
            self.files.fetch(&version.url, &path, self.progress).await?;
        }

        read_json(&path).await
    }
}
