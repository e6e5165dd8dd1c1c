use std::{path::PathBuf, sync::Arc};

use ember_core::{
    configs::LauncherConfig,
    events::{EventSink, LauncherEvent, SharedSink, TracingEvents},
    repository::username::Username,
    DEFAULT_DATA_DIR, EMBER_CONFIG_FILE,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::info;

use crate::args::{Cli, Command};

pub async fn process_args(args: &Cli) -> anyhow::Result<()> {
    let config = load_config(args).await?;

    match &args.command {
        Command::List => list(&config).await,
        Command::Launch { username, version } => launch(&config, username, version).await,
        Command::Command { username, version } => command(&config, username, version).await,
        Command::Init => config.save(config_path(args)).await,
    }
}

fn config_path(args: &Cli) -> PathBuf {
    args.config.clone().unwrap_or_else(|| {
        args.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
            .join(EMBER_CONFIG_FILE)
    })
}

/// Config file values with command line flags applied on top.
async fn load_config(args: &Cli) -> anyhow::Result<LauncherConfig> {
    let path = config_path(args);

    let mut config = if args.config.is_some() {
        LauncherConfig::load(&path).await?
    } else {
        LauncherConfig::load_or_default(&path).await?
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    if let Some(java) = &args.java {
        config.java = Some(java.clone());
    }
    if let Some(retries) = args.retries {
        config.retries = retries;
    }

    Ok(config)
}

/// Channel whose events are written to the log by a background task.
/// The task ends once every sender is dropped.
fn event_channel() -> (mpsc::Sender<LauncherEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(100);

    let consumer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            TracingEvents.emit(event).await;
        }
    });

    (tx, consumer)
}

pub async fn list(config: &LauncherConfig) -> anyhow::Result<()> {
    let launcher = config.launcher()?;

    for version in launcher.list_versions().await? {
        println!(
            "{:<32} {:<10} {}",
            version.id,
            version.version_type,
            version.release_time.date_naive()
        );
    }

    Ok(())
}

pub async fn launch(config: &LauncherConfig, username: &str, version: &str) -> anyhow::Result<()> {
    let username = Username::new(username)?;
    let launcher = config.launcher()?;

    let (tx, consumer) = event_channel();
    let sink: SharedSink = Arc::new(tx);

    let result = async {
        let process = launcher.launch(&username, version, sink).await?;
        process.wait().await
    }
    .await;

    consumer.await?;

    let code = result?;
    info!("Game closed with code {code:?}");

    Ok(())
}

pub async fn command(config: &LauncherConfig, username: &str, version: &str) -> anyhow::Result<()> {
    let username = Username::new(username)?;
    let launcher = config.launcher()?;

    let (tx, consumer) = event_channel();
    let result = launcher.command(&username, version, &tx).await;
    drop(tx);
    consumer.await?;

    println!("{}", result?);

    Ok(())
}
