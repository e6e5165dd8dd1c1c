use std::path::{Path, PathBuf};

use crate::{ASSETS_DIR, LIBRARIES_DIR, NATIVES_DIR, VERSIONS_DIR};

/// Storage layout beneath a single data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    pub game: PathBuf,
    pub versions: PathBuf,
    pub assets: PathBuf,
    pub libraries: PathBuf,
    pub natives: PathBuf,
}

impl GamePaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();

        Self {
            game: root.to_path_buf(),
            versions: root.join(VERSIONS_DIR),
            assets: root.join(ASSETS_DIR),
            libraries: root.join(LIBRARIES_DIR),
            natives: root.join(NATIVES_DIR),
        }
    }

    pub fn make_absolute(self) -> std::io::Result<Self> {
        if self.game.is_absolute() {
            return Ok(self);
        }

        Ok(Self::new(std::env::current_dir()?.join(self.game)))
    }

    pub fn version_dir(&self, id: &str) -> PathBuf {
        self.versions.join(id)
    }

    pub fn version_json(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{id}.json"))
    }

    pub fn version_jar(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{id}.jar"))
    }

    pub fn library(&self, relative: &str) -> PathBuf {
        self.libraries.join(relative)
    }

    pub fn natives_dir(&self, id: &str) -> PathBuf {
        self.natives.join(id)
    }

    pub fn asset_index(&self, id: &str) -> PathBuf {
        self.assets.join("indexes").join(format!("{id}.json"))
    }

    pub fn asset_object(&self, hash: &str) -> PathBuf {
        self.assets.join("objects").join(hash_prefix(hash)).join(hash)
    }
}

/// First two characters of a content hash, the fan-out directory of an object.
pub fn hash_prefix(hash: &str) -> &str {
    hash.get(..2).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let paths = GamePaths::new("/data");

        assert_eq!(paths.version_json("1.20.1"), Path::new("/data/versions/1.20.1/1.20.1.json"));
        assert_eq!(paths.version_jar("1.20.1"), Path::new("/data/versions/1.20.1/1.20.1.jar"));
        assert_eq!(paths.asset_index("5"), Path::new("/data/assets/indexes/5.json"));
        assert_eq!(
            paths.asset_object("ab12cd"),
            Path::new("/data/assets/objects/ab/ab12cd")
        );
        assert_eq!(paths.natives_dir("1.8.9"), Path::new("/data/natives/1.8.9"));
        assert_eq!(
            paths.library("org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar"),
            Path::new("/data/libraries/org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1.jar")
        );
    }
}
