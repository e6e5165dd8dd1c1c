pub mod assets;
pub mod libraries;
pub mod natives;
pub mod version;

pub use assets::AssetsDownloader;
pub use libraries::LibrariesDownloader;
pub use natives::NativesExtractor;
pub use version::ClientDownloader;
