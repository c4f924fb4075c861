mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::{build, encode, rhymes, stats};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    let config = context::load_config(&cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Command::Build(cmd) => build::run(cmd, config, format).await,
        Command::Rhymes(cmd) => rhymes::run(cmd, config, format),
        Command::Encode(cmd) => encode::run(cmd, config, format),
        Command::Stats => stats::run(config, format),
    }
}
