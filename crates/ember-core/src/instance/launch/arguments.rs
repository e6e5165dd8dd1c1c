use std::{
    collections::HashMap,
    fmt::Display,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use itertools::Itertools;
use regex::{Captures, Regex};
use typed_builder::TypedBuilder;

use crate::{
    game_paths::GamePaths,
    platform::Platform,
    repository::{
        java_runner::JavaRunner,
        manifest::{Argument, Arguments},
        resolve::VersionDescriptor,
        username::Username,
    },
    EMBER_CLIENT_ID, EMBER_NAME, EMBER_VERSION,
};

use super::{
    classpath::{classpath_entries, join_classpath},
    rules::rules_allow,
};

// PANICS: the pattern is a valid regex.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").unwrap());

pub type Placeholders = HashMap<&'static str, String>;

/// Replaces every `${name}` in `template` with its value in one pass.
///
/// Substituted values are never scanned again and unknown names stay as they are.
pub fn substitute(template: &str, placeholders: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            placeholders
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

/// The fully synthesized process invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchCommand {
    pub executable: JavaRunner,
    pub args: Vec<String>,
    pub classpath: String,
    pub natives_dir: PathBuf,
}

impl Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.executable.get_string())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, TypedBuilder)]
pub struct ArgumentsBuilder<'a> {
    descriptor: &'a VersionDescriptor,
    paths: &'a GamePaths,
    username: &'a Username,
    #[builder(setter(into))]
    client_jar: PathBuf,
    #[builder(setter(into))]
    natives_dir: PathBuf,
    #[builder(default)]
    platform: Platform,
    #[builder(default)]
    java: JavaRunner,
}

impl ArgumentsBuilder<'_> {
    pub fn classpath(&self) -> String {
        let entries = classpath_entries(
            self.paths,
            &self.descriptor.libraries,
            self.platform.os,
            &self.client_jar,
        );

        join_classpath(&entries, self.platform.os)
    }

    pub fn placeholders(&self, classpath: &str) -> Placeholders {
        let uuid = self.username.offline_uuid().to_string();
        let assets = path_to_string(&self.paths.assets);

        HashMap::from([
            ("auth_player_name", self.username.get().to_owned()),
            ("version_name", self.descriptor.id.clone()),
            ("version_type", self.descriptor.version_type.to_string()),
            ("game_directory", path_to_string(&self.paths.game)),
            ("assets_root", assets.clone()),
            ("game_assets", assets),
            ("assets_index_name", self.descriptor.asset_index_name().to_owned()),
            ("auth_uuid", uuid.clone()),
            ("auth_access_token", uuid.clone()),
            ("auth_session", uuid),
            ("user_type", "legacy".to_owned()),
            ("clientid", EMBER_CLIENT_ID.to_owned()),
            ("auth_xuid", "0".to_owned()),
            ("natives_directory", path_to_string(&self.natives_dir)),
            ("launcher_name", EMBER_NAME.to_owned()),
            ("launcher_version", EMBER_VERSION.to_owned()),
            ("classpath", classpath.to_owned()),
            ("classpath_separator", self.platform.os.classpath_separator().to_owned()),
            ("library_directory", path_to_string(&self.paths.libraries)),
            ("user_properties", "{}".to_owned()),
        ])
    }

    pub fn jvm_arguments(&self, classpath: &str, placeholders: &Placeholders) -> Vec<String> {
        match &self.descriptor.arguments {
            Some(Arguments { jvm, .. }) => jvm
                .iter()
                .flat_map(|arg| match arg {
                    Argument::Plain(template) => vec![substitute(template, placeholders)],
                    Argument::Conditional { rules, value } if rules_allow(Some(rules.as_slice()), self.platform.os) => value
                        .as_slice()
                        .iter()
                        .map(|template| substitute(template, placeholders))
                        .collect(),
                    Argument::Conditional { .. } => Vec::new(),
                })
                .collect(),
            None => vec![
                format!("-Djava.library.path={}", self.natives_dir.display()),
                "-cp".to_owned(),
                classpath.to_owned(),
            ],
        }
    }

    /// Conditional game arguments (demo mode, custom resolution and the like) are never emitted.
    pub fn game_arguments(&self, placeholders: &Placeholders) -> Vec<String> {
        match &self.descriptor.arguments {
            Some(Arguments { game, .. }) => game
                .iter()
                .filter_map(|arg| match arg {
                    Argument::Plain(template) => Some(substitute(template, placeholders)),
                    Argument::Conditional { .. } => None,
                })
                .collect(),
            None => self
                .descriptor
                .minecraft_arguments
                .as_deref()
                .unwrap_or_default()
                .split_whitespace()
                .map(|template| substitute(template, placeholders))
                .collect(),
        }
    }

    pub fn finish(self) -> LaunchCommand {
        let classpath = self.classpath();
        let placeholders = self.placeholders(&classpath);

        let args = self
            .jvm_arguments(&classpath, &placeholders)
            .into_iter()
            .chain(self.descriptor.main_class.clone())
            .chain(self.game_arguments(&placeholders))
            .filter(|arg| !arg.is_empty())
            .collect_vec();

        LaunchCommand {
            executable: self.java,
            args,
            classpath,
            natives_dir: self.natives_dir,
        }
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
