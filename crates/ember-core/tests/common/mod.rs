#![allow(dead_code)]

use std::path::Path;

use ember_core::{
    downloads::{FileDownloader, RetryPolicy},
    game_paths::GamePaths,
    instance::Launcher,
    platform::{OsName, Platform},
    repository::{catalog::VersionCatalog, java_runner::JavaRunner},
};
use httpmock::{prelude::*, Mock};
use serde_json::json;

pub const CATALOG_PATH: &str = "/mc/game/version_manifest.json";

pub fn init_tracing() -> tracing::subscriber::DefaultGuard {
    tracing::subscriber::set_default(tracing_subscriber::fmt().with_test_writer().finish())
}

pub fn catalog(server: &MockServer, paths: &GamePaths) -> VersionCatalog {
    VersionCatalog::new(reqwest::Client::new(), server.url(CATALOG_PATH), &paths.versions)
}

pub fn launcher(server: &MockServer, root: &Path) -> Launcher {
    let paths = GamePaths::new(root);

    Launcher::builder()
        .catalog(catalog(server, &paths))
        .paths(paths)
        .files(FileDownloader::new().retry(RetryPolicy::none()))
        .java(JavaRunner::str("java"))
        .platform(Platform::new(OsName::Linux, "64"))
        .resources_url(server.url("/resources"))
        .build()
}

/// Serves a catalog listing `versions` as `(id, releaseTime)`, each manifest under `/v1/<id>.json`.
pub async fn mock_catalog<'a>(server: &'a MockServer, versions: &[(&str, &str)]) -> Mock<'a> {
    let versions = versions
        .iter()
        .map(|(id, release_time)| {
            json!({
                "id": id,
                "type": "release",
                "url": server.url(format!("/v1/{id}.json")),
                "time": release_time,
                "releaseTime": release_time,
            })
        })
        .collect::<Vec<_>>();

    let body = json!({
        "latest": { "release": "", "snapshot": "" },
        "versions": versions,
    });

    server
        .mock_async(|when, then| {
            when.method(GET).path(CATALOG_PATH);
            then.status(200).json_body(body.clone());
        })
        .await
}

pub async fn mock_json<'a>(server: &'a MockServer, path: &str, body: serde_json::Value) -> Mock<'a> {
    let path = path.to_owned();
    server
        .mock_async(|when, then| {
            when.method(GET).path(path.clone());
            then.status(200).json_body(body.clone());
        })
        .await
}

pub async fn mock_bytes<'a>(server: &'a MockServer, path: &str, body: Vec<u8>) -> Mock<'a> {
    let path = path.to_owned();
    server
        .mock_async(|when, then| {
            when.method(GET).path(path.clone());
            then.status(200).body(body.clone());
        })
        .await
}

/// Installs a version JSON the way a manual install would.
pub fn install_local(paths: &GamePaths, id: &str, body: &serde_json::Value) {
    let path = paths.version_json(id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(body).unwrap()).unwrap();
}

pub fn library(name: &str, url: &str) -> serde_json::Value {
    json!({
        "name": name,
        "downloads": { "artifact": { "path": format!("{name}/{name}.jar"), "url": url } }
    })
}
