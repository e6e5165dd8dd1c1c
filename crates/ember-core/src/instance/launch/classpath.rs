use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::{game_paths::GamePaths, platform::OsName, repository::manifest::Library};

use super::rules::is_library_allowed;

/// Every library jar enabled on `os`, in declaration order, followed by the client jar.
pub fn classpath_entries(paths: &GamePaths, libraries: &[Library], os: OsName, client_jar: &Path) -> Vec<PathBuf> {
    let mut classpath = libraries
        .iter()
        .filter(|lib| is_library_allowed(lib, os))
        .filter_map(Library::artifact)
        .map(|(_, path)| {
            let path = if os == OsName::Windows {
                path.replace('/', "\\")
            } else {
                path.to_owned()
            };

            paths.libraries.join(path)
        })
        .collect_vec();

    classpath.push(client_jar.to_path_buf());

    classpath
}

pub fn join_classpath(entries: &[PathBuf], os: OsName) -> String {
    entries
        .iter()
        .map(|path| path.display().to_string())
        .join(os.classpath_separator())
}
