//! CLI command handlers

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::ServerSetup;
use crate::browse;
use crate::catalog::{Catalog, CatalogClient, CoverFit};
use crate::config::ClientConfig;
use crate::events;
use crate::nav::{DeleteOutcome, LogLevel, LogLine, NavigationState, Navigator, ViewSynchronizer};
use crate::render::{self, DisplayNode};

/// Load the config and build a client for the effective server
fn connect(server: Option<&str>) -> Result<(CatalogClient, ClientConfig)> {
    let config = ClientConfig::load()?;
    let url = config.resolve_server(server);
    let client = CatalogClient::new(&url)?;
    Ok((client, config))
}

/// One synchronizer cycle outside the browser
async fn load_once(
    client: &CatalogClient,
    root: Option<&str>,
    keyword: &str,
) -> Result<NavigationState> {
    let mut state = NavigationState::new();
    let mut sync = ViewSynchronizer::new();
    sync.load_view(client, &mut state, root, keyword)
        .await
        .context("Failed to load albums")?;
    Ok(state)
}

fn print_log_line(line: &LogLine) {
    let text = line.render();
    let styled = match line.level {
        LogLevel::Info => text.normal(),
        LogLevel::Ok => text.green(),
        LogLevel::Warn => text.yellow(),
        LogLevel::Error => text.red(),
    };
    println!("{}", styled);
}

/// Handle the `browse` command
pub async fn browse(server: Option<String>, path: Option<String>, keyword: Option<String>) -> Result<()> {
    let config = ClientConfig::load()?;
    let url = config.resolve_server(server.as_deref());

    println!("{}", "Connecting to catalog server...".cyan());
    let client = ServerSetup::connect(&url).await?;
    println!("{}", "Connected!".green());

    browse::run_browser(client, &config, path, keyword.unwrap_or_default()).await
}

/// Handle the `tree` command
pub async fn tree(server: Option<String>, keyword: Option<String>) -> Result<()> {
    let (client, _) = connect(server.as_deref())?;
    let state = load_once(&client, None, keyword.as_deref().unwrap_or("")).await?;

    let nodes = render::tree::derive(&state);
    if nodes.is_empty() {
        println!("{}", render::grid::empty_message(&state).yellow());
        return Ok(());
    }

    fn print_nodes(nodes: &[DisplayNode]) {
        for node in nodes {
            let indent = "  ".repeat(node.depth);
            let label = if node.navigable {
                node.label.blue().bold()
            } else {
                node.label.normal()
            };
            println!("{}{}  {}", indent, label, node.meta().dimmed());
            print_nodes(&node.children);
        }
    }
    print_nodes(&nodes);

    println!();
    println!("{} albums", state.index().len());
    Ok(())
}

/// Handle the `ls` command
pub async fn ls(server: Option<String>, path: Option<String>, keyword: Option<String>) -> Result<()> {
    let (client, config) = connect(server.as_deref())?;
    let requested = path.as_deref();
    let state = load_once(&client, requested, keyword.as_deref().unwrap_or("")).await?;

    if requested.is_some() && state.current_root().is_none() {
        println!(
            "{}",
            format!("{} is not in the catalog, showing the top level", requested.unwrap_or_default())
                .yellow()
        );
    }

    let view = render::grid::derive(&state, &client, config.cover_size());
    if let Some(crumbs) = &view.breadcrumb {
        println!("{}", crumbs.render().bold());
        println!();
    }
    if let Some(message) = view.empty_message {
        println!("{}", message.yellow());
        return Ok(());
    }

    for card in &view.cards {
        let title = if card.navigable {
            card.title.blue().bold()
        } else {
            card.title.normal()
        };
        println!(
            "  {:>6}  {}  {}  {}",
            card.album.id,
            title,
            card.subtitle.dimmed(),
            card.size.as_deref().unwrap_or("").dimmed()
        );
        if let Some(location) = &card.location {
            println!("          {}", format!("in {}", location).dimmed());
        }
    }
    Ok(())
}

/// Handle the `scan` command
pub async fn scan(server: Option<String>, paths: Vec<String>, recursive: bool) -> Result<()> {
    let (client, config) = connect(server.as_deref())?;
    let recursive = recursive || config.recursive_scan;

    let mut navigator = Navigator::new(Arc::new(client));
    navigator.scan(&paths, recursive).await.context("Scan was not accepted")?;
    navigator.settle().await;

    println!("{}", "Scan submitted.".green().bold());
    println!("Run {} to follow its progress.", "albumnav watch".cyan());
    Ok(())
}

/// Handle the `refresh` command
pub async fn refresh(server: Option<String>) -> Result<()> {
    let (client, _) = connect(server.as_deref())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Checking catalog for missing albums...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.refresh().await;
    spinner.finish_and_clear();
    let summary = result.context("Refresh failed")?;

    println!("{}", "Refresh complete!".green().bold());
    println!("  Checked: {}", summary.checked);
    if summary.removed > 0 {
        println!("  Removed: {}", summary.removed.to_string().yellow());
    } else {
        println!("  Removed: 0");
    }
    Ok(())
}

/// Handle the `delete` command
pub async fn delete(server: Option<String>, path: String, yes: bool) -> Result<()> {
    let (client, _) = connect(server.as_deref())?;

    let mut navigator = Navigator::new(Arc::new(client));
    navigator.open_album(None);
    navigator.settle().await;

    let mut ask = |prompt: &str| {
        yes || dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    };
    let outcome = navigator
        .delete_path(&path, &mut ask)
        .await
        .with_context(|| format!("Failed to delete {}", path))?;
    navigator.settle().await;

    match outcome {
        DeleteOutcome::Deleted => println!("{} {}", "Deleted".green().bold(), path),
        DeleteOutcome::Cancelled => println!("{}", "Cancelled.".yellow()),
    }
    Ok(())
}

/// Handle the `watch` command
pub async fn watch(server: Option<String>) -> Result<()> {
    let (client, _) = connect(server.as_deref())?;
    println!(
        "Following scan progress on {} (Ctrl+C to stop)",
        client.events_url().as_str().cyan()
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = events::spawn(client, tx);

    loop {
        tokio::select! {
            line = rx.recv() => match line {
                Some(line) => print_log_line(&line),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    listener.abort();
    Ok(())
}

/// Handle the `cover` command
pub async fn cover(server: Option<String>, id: i64, out: &Path, contain: bool) -> Result<()> {
    let (client, config) = connect(server.as_deref())?;
    let size = config.cover_size();
    let fit = if contain { CoverFit::Contain } else { CoverFit::Cover };

    let bytes = client
        .fetch_cover(id, size.width, size.height, fit)
        .await
        .with_context(|| format!("Failed to fetch cover for album {}", id))?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("Failed to write cover to {:?}", out))?;

    println!(
        "Saved {} cover ({}) to {}",
        id,
        crate::utils::format_size(bytes.len() as u64),
        out.display()
    );
    Ok(())
}

/// Handle the `settings` command
pub async fn settings(server: Option<String>) -> Result<()> {
    let (client, _) = connect(server.as_deref())?;
    let settings = client.settings().await.context("Failed to read server settings")?;

    fn show<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    }

    println!("{} {}", "Server:".bold(), client.base_url());
    println!("  Cache dir:          {}", show(settings.cache_dir));
    println!(
        "  Cache limit:        {}",
        show(settings.cache_max_bytes.map(crate::utils::format_size))
    );
    println!("  Default quality:    {}", show(settings.default_quality));
    println!("  Encode format:      {}", show(settings.encode_format));
    println!("  IO concurrency:     {}", show(settings.io_concurrency));
    println!("  Decode concurrency: {}", show(settings.decode_concurrency));
    println!("  Recursive scans:    {}", show(settings.allow_recursive));
    println!("  Max input pixels:   {}", show(settings.max_input_pixels));
    Ok(())
}

/// Handle `config set-server`
pub async fn set_server(url: Option<String>, no_check: bool) -> Result<()> {
    println!("{}", "Configuring catalog server...".cyan());
    let url = ServerSetup::configure(url, no_check).await?;

    println!();
    println!("{}", "Server saved!".green().bold());
    println!("  Server: {}", url);
    Ok(())
}

/// Handle `config show`
pub fn show_config(server: Option<String>) -> Result<()> {
    let config = ClientConfig::load()?;
    let path = ClientConfig::config_path()?;

    println!("{} {}", "Config file:".bold(), path.display());
    println!("  Saved server:     {}", config.server_url.as_deref().unwrap_or("(none)"));
    println!("  Effective server: {}", config.resolve_server(server.as_deref()).cyan());
    println!("  Recursive scans:  {}", config.recursive_scan);
    println!("  Cover size:       {}x{}", config.cover_width, config.cover_height);
    Ok(())
}

/// Handle the `completion` command
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = super::Cli::command();
    generate(shell, &mut cmd, "albumnav", &mut io::stdout());
}
