use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    downloads::{traits::Downloader, FileDownloader},
    error::Result,
    events::{EventSink, LauncherEvent},
    fs::read_json,
    game_paths::{hash_prefix, GamePaths},
    repository::manifest::AssetIndex,
};

/// A fetched asset index document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Assets {
    /// Ordered by name so objects are always processed in the same order.
    pub objects: BTreeMap<String, AssetInformation>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetInformation {
    pub hash: String,
    pub size: u64,
}

/// Brings `assets/indexes` and `assets/objects` in line with an asset index.
#[derive(Debug)]
pub struct AssetsDownloader<'a> {
    files: &'a FileDownloader,
    paths: &'a GamePaths,
    index: Option<&'a AssetIndex>,
    resources_url: &'a str,
}

impl<'a> AssetsDownloader<'a> {
    pub fn new(
        files: &'a FileDownloader,
        paths: &'a GamePaths,
        index: Option<&'a AssetIndex>,
        resources_url: &'a str,
    ) -> Self {
        Self {
            files,
            paths,
            index,
            resources_url,
        }
    }

    pub fn object_url(&self, hash: &str) -> String {
        format!("{}/{}/{hash}", self.resources_url.trim_end_matches('/'), hash_prefix(hash))
    }
}

#[async_trait::async_trait]
impl Downloader for AssetsDownloader<'_> {
    fn status(&self) -> String {
        "Synchronizing assets".to_owned()
    }

    #[tracing::instrument(skip_all)]
    async fn download(&self, sink: &dyn EventSink) -> Result<()> {
        let Some(index) = self.index else {
            info!("Version has no asset index, skipping assets");
            return Ok(());
        };

        let index_path = self.paths.asset_index(&index.id);
        self.files.fetch(&index.url, &index_path, None).await?;

        let assets: Assets = read_json(&index_path).await?;
        let total = assets.objects.len();

        for (downloaded, (name, asset)) in assets.objects.iter().enumerate() {
            debug!("Asset {name}");

            self.files
                .fetch(&self.object_url(&asset.hash), self.paths.asset_object(&asset.hash), None)
                .await?;

            sink.emit(LauncherEvent::Assets {
                downloaded: downloaded + 1,
                total,
            })
            .await;
        }

        info!("Synchronized {total} assets of index {}", index.id);

        Ok(())
    }
}
