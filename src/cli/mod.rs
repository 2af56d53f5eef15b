//! CLI module for albumnav

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod server;

pub use server::ServerSetup;

#[derive(Parser, Debug)]
#[command(name = "albumnav", about = "Browse a remote album catalog from the terminal")]
#[command(version, author)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Catalog server URL (overrides the saved one)
    #[arg(long, global = true, env = "ALBUMNAV_URL")]
    pub server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive tree and grid browser (the default)
    Browse {
        /// Album to open first
        #[arg(long)]
        path: Option<String>,

        /// Initial search keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Print the album hierarchy
    Tree {
        /// Only show albums matching this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// List the children of an album (top level when omitted)
    Ls {
        #[arg(value_name = "PATH")]
        path: Option<String>,

        /// Only show albums matching this keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Ask the server to scan paths into the catalog
    Scan {
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<String>,

        /// Descend into sub-folders
        #[arg(short, long)]
        recursive: bool,
    },

    /// Drop albums whose files no longer exist
    Refresh,

    /// Remove an album from the catalog (files on disk are kept)
    Delete {
        #[arg(value_name = "PATH")]
        path: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Follow live scan progress
    Watch,

    /// Download an album's cover thumbnail
    Cover {
        /// Album id
        id: i64,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        /// Fit the whole page inside the box instead of filling it
        #[arg(long)]
        contain: bool,
    },

    /// Show the server's runtime settings
    Settings,

    /// Manage client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Remember a catalog server (prompts when URL is omitted)
    SetServer {
        url: Option<String>,

        /// Store without checking that the server answers
        #[arg(long)]
        no_check: bool,
    },

    /// Print the current configuration
    Show,
}
