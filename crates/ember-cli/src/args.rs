use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(verbatim_doc_comment)]
///     ______          __
///    / ____/___ ___  / /_  ___  _____
///   / __/ / __ `__ \/ __ \/ _ \/ ___/
///  / /___/ / / / / / /_/ /  __/ /
/// /_____/_/ /_/ /_/_.___/\___/_/
/// Offline launcher CLI
pub struct Cli {
    /// Data directory holding versions, libraries, natives and assets
    #[arg(long, short = 'g')]
    pub data_dir: Option<PathBuf>,
    /// Config file, `<data dir>/Ember.toml` by default
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Java executable to launch the game with
    #[arg(long, short)]
    pub java: Option<PathBuf>,
    /// Attempts per download
    #[arg(long)]
    pub retries: Option<u32>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show remote and locally installed versions
    List,
    /// Download everything a version needs and start it
    Launch { username: String, version: String },
    /// Download everything a version needs and print the launch command
    Command { username: String, version: String },
    /// Write the effective config into the config file
    Init,
}
