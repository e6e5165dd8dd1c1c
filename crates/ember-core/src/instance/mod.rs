use std::path::PathBuf;

use tokio::process::Child;
use tracing::{error, info};
use typed_builder::TypedBuilder;

use crate::{
    downloads::{
        traits::DownloadQueue, AssetsDownloader, ClientDownloader, FileDownloader, LibrariesDownloader,
        NativesExtractor,
    },
    error::{Error, Result},
    events::{EventSink, LauncherEvent, SharedSink},
    game_paths::GamePaths,
    platform::Platform,
    repository::{
        catalog::{VersionCatalog, VersionSummary},
        java_runner::JavaRunner,
        resolve::{VersionDescriptor, VersionResolver},
        username::Username,
    },
    RESOURCES_URL,
};

use self::launch::{
    arguments::{ArgumentsBuilder, LaunchCommand},
    forward_lines, spawn,
};

pub mod launch;

/// Runs the whole pipeline from a version id to a running game.
#[derive(Debug, TypedBuilder)]
pub struct Launcher {
    paths: GamePaths,
    catalog: VersionCatalog,
    #[builder(default)]
    files: FileDownloader,
    #[builder(default)]
    java: JavaRunner,
    #[builder(default)]
    platform: Platform,
    #[builder(default = RESOURCES_URL.to_owned(), setter(into))]
    resources_url: String,
}

impl Launcher {
    pub fn paths(&self) -> &GamePaths {
        &self.paths
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    pub async fn list_versions(&self) -> Result<Vec<VersionSummary>> {
        self.catalog.list_versions().await
    }

    pub async fn resolve(&self, version_id: &str) -> Result<VersionDescriptor> {
        VersionResolver::new(&self.catalog, &self.files, &self.paths)
            .resolve(version_id)
            .await
    }

    /// Prepares everything `version_id` needs and returns the command that would start it.
    pub async fn command(&self, username: &Username, version_id: &str, sink: &dyn EventSink) -> Result<LaunchCommand> {
        report(self.prepare(username, version_id, sink).await, sink).await
    }

    /// Prepares `version_id` and starts it. Any failure before the process is
    /// running is reported once as [`LauncherEvent::Failed`].
    #[tracing::instrument(skip(self, username, sink), fields(username = username.get()))]
    pub async fn launch(&self, username: &Username, version_id: &str, sink: SharedSink) -> Result<GameProcess> {
        let started = async {
            let command = self.prepare(username, version_id, sink.as_ref()).await?;

            tokio::fs::create_dir_all(&self.paths.game)
                .await
                .map_err(Error::io(&self.paths.game))?;

            sink.emit(LauncherEvent::Status(format!("Launching {version_id}"))).await;
            spawn(&command, &self.paths.game)
        }
        .await;

        let child = report(started, sink.as_ref()).await?;
        info!("Game process started with pid {:?}", child.id());

        Ok(GameProcess {
            child,
            sink,
            game_dir: self.paths.game.clone(),
        })
    }

    async fn prepare(&self, username: &Username, version_id: &str, sink: &dyn EventSink) -> Result<LaunchCommand> {
        sink.emit(LauncherEvent::Status(format!("Resolving {version_id}"))).await;
        let descriptor = VersionResolver::new(&self.catalog, &self.files, &self.paths)
            .with_progress(sink)
            .resolve(version_id)
            .await?;

        let client = ClientDownloader::new(&self.files, &self.paths, &descriptor);
        let client_jar = client.jar().clone();
        let natives_dir = self.paths.natives_dir(&descriptor.id);

        DownloadQueue::new()
            .with_downloader(client)
            .with_downloader(LibrariesDownloader::new(
                &self.files,
                &self.paths,
                &descriptor.libraries,
                self.platform.os,
            ))
            .with_downloader(NativesExtractor::new(
                &self.files,
                &self.paths,
                &descriptor.libraries,
                &self.platform,
                &natives_dir,
            ))
            .with_downloader(AssetsDownloader::new(
                &self.files,
                &self.paths,
                descriptor.asset_index.as_ref(),
                &self.resources_url,
            ))
            .download(sink)
            .await?;

        let command = ArgumentsBuilder::builder()
            .descriptor(&descriptor)
            .paths(&self.paths)
            .username(username)
            .client_jar(client_jar)
            .natives_dir(natives_dir)
            .platform(self.platform.clone())
            .java(self.java.clone())
            .build()
            .finish();

        info!("Launch command: {command}");

        Ok(command)
    }
}

async fn report<T>(result: Result<T>, sink: &dyn EventSink) -> Result<T> {
    if let Err(err) = &result {
        error!("{err}");
        sink.emit(LauncherEvent::Failed(err.to_string())).await;
    }
    result
}

/// A running game whose output is forwarded as events.
pub struct GameProcess {
    child: Child,
    sink: SharedSink,
    game_dir: PathBuf,
}

impl GameProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Forwards stdout and stderr until the game exits, then emits
    /// [`LauncherEvent::GameClosed`]. A non-zero exit code is not an error.
    pub async fn wait(mut self) -> Result<Option<i32>> {
        let stdout = self.child.stdout.take();
        let stderr = self.child.stderr.take();

        let (status, (), ()) = tokio::join!(
            self.child.wait(),
            forward_lines(stdout, "[game]", self.sink.as_ref()),
            forward_lines(stderr, "[game:err]", self.sink.as_ref()),
        );

        let code = match status {
            Ok(status) => status.code(),
            Err(err) => {
                self.sink.emit(LauncherEvent::GameClosed { code: None }).await;
                return Err(Error::io(&self.game_dir)(err));
            }
        };

        info!("Minecraft exit code: {code:?}");
        self.sink.emit(LauncherEvent::GameClosed { code }).await;

        Ok(code)
    }
}
