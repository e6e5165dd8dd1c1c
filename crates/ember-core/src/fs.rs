use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

pub async fn write_toml_config<T>(data: &T, path: impl AsRef<Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let body = toml::to_string_pretty(data)?;
    write_to_file(body.as_bytes(), path).await?;

    tracing::info!("Config {} has been created successfully", path.to_string_lossy());

    Ok(())
}

pub async fn read_toml_config<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let string = tokio::fs::read_to_string(&path).await?;
    let body: T = toml::from_str(&string)?;

    tracing::info!("Config {} has been read successfully", path.to_string_lossy());

    Ok(body)
}

/// Reads a JSON document, reporting the exact field that failed to deserialize.
pub async fn read_json<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let s = tokio::fs::read_to_string(path).await.map_err(Error::io(path))?;
    parse_json(&s, path)
}

pub(crate) fn parse_json<T>(s: &str, path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let deserializer = &mut serde_json::Deserializer::from_str(s);
    serde_path_to_error::deserialize(deserializer).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn write_to_file(data: &[u8], path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let mut file = tokio::fs::File::create(&path).await?;

    file.write_all(data).await?;
    file.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Outer {
        inner: Inner,
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Inner {
        size: u64,
    }

    #[tokio::test]
    async fn json_error_reports_field_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        write_to_file(br#"{"inner": {"size": "big"}}"#, &path).await.unwrap();

        let err = read_json::<Outer>(&path).await.unwrap_err();
        assert!(err.to_string().contains("inner.size"), "{err}");
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_to_file(b"data", &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }
}
