mod config;
mod form;
mod logging;
mod poll;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uploader_logging::{uploader_info, Subsystem};
use url::Url;

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};

#[derive(Debug, Parser)]
#[command(name = "uploader", version, about = "Headless client for the photo uploader pages")]
struct Cli {
    /// RON configuration file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Follow a result page until its job finishes.
    Poll {
        /// Result page URL, e.g. https://host/result/<id>
        page_url: Url,
        /// Use this session id instead of reading the page metadata.
        #[arg(long)]
        session: Option<String>,
    },
    /// Edit the upload form from stdin with autosave.
    Form,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    logging::initialize(config.log_destination, config.level()?, &config.log_file)
        .with_context(|| format!("failed to open log file {:?}", config.log_file))?;
    uploader_info!(Subsystem::App, "config {:?} loaded", cli.config);

    match cli.command {
        Command::Poll { page_url, session } => {
            poll::run(&config, &page_url, session.as_deref()).await?;
        }
        Command::Form => form::run(&config).await?,
    }
    Ok(())
}
