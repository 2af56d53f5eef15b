//! albumnav - Browse a remote album catalog from the terminal

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod browse;
mod catalog;
mod cli;
mod config;
mod events;
mod nav;
mod render;
mod utils;

use cli::{Cli, Commands, ConfigAction};
use utils::ConditionalStderrLayer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "albumnav=debug,reqwest=debug"
    } else {
        "albumnav=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(ConditionalStderrLayer::new(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        ))
        .init();

    let server = cli.server;
    let command = cli.command.unwrap_or(Commands::Browse {
        path: None,
        keyword: None,
    });

    match command {
        Commands::Browse { path, keyword } => {
            cli::commands::browse(server, path, keyword).await?;
        }
        Commands::Tree { keyword } => {
            cli::commands::tree(server, keyword).await?;
        }
        Commands::Ls { path, keyword } => {
            cli::commands::ls(server, path, keyword).await?;
        }
        Commands::Scan { paths, recursive } => {
            cli::commands::scan(server, paths, recursive).await?;
        }
        Commands::Refresh => {
            cli::commands::refresh(server).await?;
        }
        Commands::Delete { path, yes } => {
            cli::commands::delete(server, path, yes).await?;
        }
        Commands::Watch => {
            cli::commands::watch(server).await?;
        }
        Commands::Cover { id, out, contain } => {
            cli::commands::cover(server, id, &out, contain).await?;
        }
        Commands::Settings => {
            cli::commands::settings(server).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::SetServer { url, no_check } => {
                cli::commands::set_server(url, no_check).await?;
            }
            ConfigAction::Show => {
                cli::commands::show_config(server)?;
            }
        },
        Commands::Completion { shell } => {
            cli::commands::completion(shell);
        }
    }

    Ok(())
}
