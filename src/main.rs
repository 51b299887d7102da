mod client;
mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventdesk_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::client::Client;
use crate::commands::EventFields;

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "List, edit and bulk-import events on the events backend")]
struct Cli {
    /// Backend root URL (overrides base_url from the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all events
    List,
    /// Add a single event (prompts for anything required that isn't given)
    Add {
        #[command(flatten)]
        fields: EventFields,
    },
    /// Edit an event (prompts for every field when no flags are given)
    Edit {
        event_id: String,

        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        event_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Import a JSON batch file
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Submit without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print a sample batch file
    Template {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the config path and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::List => commands::list::run(&Client::from_config(&config)?).await,
        Commands::Add { fields } => commands::add::run(&Client::from_config(&config)?, fields).await,
        Commands::Edit { event_id, fields } => {
            commands::edit::run(&Client::from_config(&config)?, &event_id, fields).await
        }
        Commands::Delete { event_id, force } => {
            commands::delete::run(&Client::from_config(&config)?, &event_id, force).await
        }
        Commands::Import { files, yes } => {
            commands::import::run(&Client::from_config(&config)?, &config, files, yes).await
        }
        Commands::Template { output } => commands::template::run(output),
        Commands::Config => commands::config::run(&config),
    }
}

/// Logs go to stderr, filtered by EVENTDESK_LOG (e.g. "eventdesk=debug").
fn init_logging() {
    let filter = EnvFilter::try_from_env("EVENTDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
