pub const EMBER_NAME: &str = "Ember";
pub const EMBER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const EMBER_CLIENT_ID: &str = "Ember_ClientID";

/// Name of the optional config file inside the data root.
pub const EMBER_CONFIG_FILE: &str = "Ember.toml";
pub const DEFAULT_DATA_DIR: &str = "./.ember";

pub const LAUNCHER_MANIFEST: &str = "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

pub const VERSIONS_DIR: &str = "versions";
pub const LIBRARIES_DIR: &str = "libraries";
pub const ASSETS_DIR: &str = "assets";
pub const NATIVES_DIR: &str = "natives";
