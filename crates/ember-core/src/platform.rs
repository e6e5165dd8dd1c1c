use std::fmt::Display;

/// OS names as they appear in version manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsName {
    Windows,
    Osx,
    Linux,
    Unknown,
}

impl OsName {
    pub fn current() -> Self {
        Self::from_rust_os(std::env::consts::OS)
    }

    pub fn from_rust_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::Osx,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Osx => "osx",
            OsName::Linux => "linux",
            OsName::Unknown => "unknown",
        }
    }

    pub fn classpath_separator(&self) -> &'static str {
        match self {
            OsName::Windows => ";",
            _ => ":",
        }
    }

    pub fn java_executable(&self) -> &'static str {
        match self {
            OsName::Windows => "java.exe",
            _ => "java",
        }
    }
}

impl Display for OsName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The machine the game is launched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsName,
    /// Token substituted for `${arch}` in native classifier keys.
    pub arch: String,
}

impl Platform {
    pub fn new(os: OsName, arch: impl Into<String>) -> Self {
        Self { os, arch: arch.into() }
    }

    pub fn current() -> Self {
        Self {
            os: OsName::current(),
            arch: arch_token(std::env::consts::ARCH),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Normalizes a Rust target architecture into the `${arch}` token used by
/// native classifiers (`natives-windows-${arch}` -> `natives-windows-64`).
pub fn arch_token(arch: &str) -> String {
    match arch {
        "x86_64" | "x64" => "64".to_owned(),
        "x86" | "x32" => "32".to_owned(),
        "aarch64" => "arm64".to_owned(),
        other => other.to_owned(),
    }
}
