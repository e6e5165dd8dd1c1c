use args::Cli;
use clap::Parser;
use commands::process_args;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();
    process_args(&args).await
}
