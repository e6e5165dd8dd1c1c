pub mod catalog;
pub mod java_runner;
pub mod launcher_manifest;
pub mod manifest;
pub mod resolve;
pub mod username;
