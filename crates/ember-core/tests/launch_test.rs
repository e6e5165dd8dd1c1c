mod common;

use std::io::Write;

use ember_core::{
    events::LauncherEvent,
    repository::username::{offline_uuid, Username},
    Error,
};
use httpmock::prelude::*;
use serde_json::json;
use zip::write::FileOptions;

use common::{init_tracing, launcher, library, mock_bytes, mock_catalog, mock_json};

const ICON_HASH: &str = "aa00000000000000000000000000000000000001";
const SOUND_HASH: &str = "bb00000000000000000000000000000000000002";

fn natives_archive() -> Vec<u8> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer.start_file("liblwjgl.so", FileOptions::default()).unwrap();
        writer.write_all(b"native").unwrap();
        writer.finish().unwrap();
    }
    buffer.into_inner()
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<LauncherEvent>) -> Vec<LauncherEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn command_materializes_the_whole_closure() {
    let _guard = init_tracing();
    let server = MockServer::start_async().await;

    mock_catalog(&server, &[("1.20.1", "2023-06-12T13:25:51+00:00")]).await;
    mock_json(
        &server,
        "/v1/1.20.1.json",
        json!({
            "id": "1.20.1",
            "type": "release",
            "mainClass": "net.minecraft.client.main.Main",
            "assetIndex": { "id": "5", "url": server.url("/indexes/5.json") },
            "downloads": { "client": { "url": server.url("/client/1.20.1.jar") } },
            "arguments": {
                "game": [
                    "--username", "${auth_player_name}",
                    "--uuid", "${auth_uuid}",
                    "--assetsDir", "${assets_root}",
                    { "rules": [{ "action": "allow" }], "value": "--demo" }
                ],
                "jvm": [
                    { "rules": [{ "action": "allow", "os": { "name": "windows" } }], "value": "-XX:HeapDumpPath=x" },
                    "-Djava.library.path=${natives_directory}",
                    "-cp", "${classpath}"
                ]
            },
            "libraries": [
                library("A", &server.url("/libs/A.jar")),
                {
                    "name": "lwjgl-platform",
                    "downloads": {
                        "classifiers": {
                            "natives-linux": { "path": "lwjgl/natives-linux.jar", "url": server.url("/libs/natives-linux.jar") }
                        }
                    },
                    "natives": { "linux": "natives-linux" }
                }
            ]
        }),
    )
    .await;

    let client = mock_bytes(&server, "/client/1.20.1.jar", b"client".to_vec()).await;
    let library_a = mock_bytes(&server, "/libs/A.jar", b"A".to_vec()).await;
    mock_bytes(&server, "/libs/natives-linux.jar", natives_archive()).await;
    mock_json(
        &server,
        "/indexes/5.json",
        json!({
            "objects": {
                "minecraft/sounds/b.ogg": { "hash": SOUND_HASH, "size": 5 },
                "icons/a.png": { "hash": ICON_HASH, "size": 4 }
            }
        }),
    )
    .await;
    let icon = mock_bytes(&server, &format!("/resources/aa/{ICON_HASH}"), b"icon".to_vec()).await;
    mock_bytes(&server, &format!("/resources/bb/{SOUND_HASH}"), b"sound".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let launcher = launcher(&server, dir.path());
    let paths = launcher.paths().clone();
    let username = Username::new("Alex").unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let command = launcher.command(&username, "1.20.1", &tx).await.unwrap();

    let client_jar = paths.version_jar("1.20.1");
    let lib_a = paths.library("A/A.jar");
    let natives = paths.natives_dir("1.20.1");

    assert_eq!(std::fs::read(&client_jar).unwrap(), b"client");
    assert_eq!(std::fs::read(&lib_a).unwrap(), b"A");
    assert_eq!(std::fs::read(natives.join("liblwjgl.so")).unwrap(), b"native");
    assert_eq!(std::fs::read(paths.asset_object(ICON_HASH)).unwrap(), b"icon");
    assert_eq!(std::fs::read(paths.asset_object(SOUND_HASH)).unwrap(), b"sound");
    assert!(paths.asset_index("5").exists());

    let classpath = format!("{}:{}", lib_a.display(), client_jar.display());
    assert_eq!(command.classpath, classpath);
    assert_eq!(command.natives_dir, natives);
    assert_eq!(command.executable.get_string(), "java");
    assert_eq!(
        command.args,
        [
            format!("-Djava.library.path={}", natives.display()),
            "-cp".to_owned(),
            classpath.clone(),
            "net.minecraft.client.main.Main".to_owned(),
            "--username".to_owned(),
            "Alex".to_owned(),
            "--uuid".to_owned(),
            offline_uuid("Alex").to_string(),
            "--assetsDir".to_owned(),
            paths.assets.display().to_string(),
        ]
    );

    let events = drain(&mut rx);
    let statuses = events
        .iter()
        .filter_map(|event| match event {
            LauncherEvent::Status(status) => Some(status.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        statuses,
        [
            "Resolving 1.20.1",
            "Downloading client 1.20.1",
            "Downloading libraries",
            "Extracting natives",
            "Synchronizing assets",
        ]
    );

    let assets = events
        .iter()
        .filter_map(|event| match event {
            LauncherEvent::Assets { downloaded, total } => Some((*downloaded, *total)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(assets, [(1, 2), (2, 2)]);
    assert!(events.iter().any(|event| matches!(event, LauncherEvent::Progress(_))));
    assert!(!events.iter().any(|event| matches!(event, LauncherEvent::Failed(_))));

    // Everything is in place now, a second run downloads nothing.
    let again = launcher.command(&username, "1.20.1", &tx).await.unwrap();
    assert_eq!(again, command);
    client.assert_hits_async(1).await;
    library_a.assert_hits_async(1).await;
    icon.assert_hits_async(1).await;
}

#[tokio::test]
async fn failures_emit_a_single_failed_event() {
    let server = MockServer::start_async().await;
    mock_catalog(&server, &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let launcher = launcher(&server, dir.path());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let err = launcher
        .command(&Username::new("Alex").unwrap(), "missing", &tx)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::VersionNotFound(_)));

    let failures = drain(&mut rx)
        .into_iter()
        .filter(|event| matches!(event, LauncherEvent::Failed(_)))
        .count();
    assert_eq!(failures, 1);
}

#[tokio::test]
async fn missing_client_jar_aborts_before_libraries() {
    let server = MockServer::start_async().await;
    mock_catalog(&server, &[("bare", "2020-01-01T00:00:00+00:00")]).await;
    mock_json(
        &server,
        "/v1/bare.json",
        json!({
            "id": "bare",
            "mainClass": "Main",
            "minecraftArguments": "--username ${auth_player_name}",
            "libraries": [library("A", &server.url("/libs/A.jar"))]
        }),
    )
    .await;
    let library_a = mock_bytes(&server, "/libs/A.jar", b"A".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let launcher = launcher(&server, dir.path());
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

    let err = launcher
        .command(&Username::new("Alex").unwrap(), "bare", &tx)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingClientDownload(id) if id == "bare"));
    library_a.assert_hits_async(0).await;
}
