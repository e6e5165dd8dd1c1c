use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::platform::OsName;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub enum JavaRunner {
    /// A command resolved through `PATH`.
    String(String),
    Path(PathBuf),
}

impl JavaRunner {
    pub fn get(&self) -> &OsStr {
        match self {
            JavaRunner::String(s) => s.as_ref(),
            JavaRunner::Path(p) => p.as_os_str(),
        }
    }

    pub fn get_string(&self) -> String {
        match self {
            JavaRunner::String(s) => s.to_string(),
            JavaRunner::Path(p) => p.to_string_lossy().into_owned(),
        }
    }

    pub fn path(p: PathBuf) -> JavaRunner {
        JavaRunner::Path(p)
    }

    pub fn str(s: &str) -> JavaRunner {
        JavaRunner::String(s.to_string())
    }

    /// `$JAVA_HOME/bin/java` when it exists, `java` from `PATH` otherwise.
    pub fn from_environment() -> JavaRunner {
        let java_home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
        Self::from_java_home(java_home.as_deref(), OsName::current())
    }

    pub fn from_java_home(java_home: Option<&Path>, os: OsName) -> JavaRunner {
        java_home
            .map(|home| home.join("bin").join(os.java_executable()))
            .filter(|path| path.exists())
            .map_or_else(JavaRunner::default, JavaRunner::Path)
    }
}

impl Default for JavaRunner {
    fn default() -> JavaRunner {
        JavaRunner::String("java".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_home_is_used_when_binary_exists() {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("java"), b"").unwrap();

        let runner = JavaRunner::from_java_home(Some(home.path()), OsName::Linux);
        assert_eq!(runner, JavaRunner::Path(bin.join("java")));

        let runner = JavaRunner::from_java_home(Some(home.path()), OsName::Windows);
        assert_eq!(runner, JavaRunner::default());
    }

    #[test]
    fn falls_back_to_path_lookup() {
        assert_eq!(JavaRunner::from_java_home(None, OsName::Linux), JavaRunner::str("java"));
        assert_eq!(
            JavaRunner::from_java_home(Some(Path::new("/definitely/not/here")), OsName::Linux),
            JavaRunner::str("java")
        );
    }
}
