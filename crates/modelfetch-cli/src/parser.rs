//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for downloading models from a model hub.
#[derive(Parser)]
#[command(name = "modelfetch")]
#[command(about = "Download models, selected files and collections from a model hub")]
#[command(version)]
pub struct Cli {
    /// Override the download root for this invocation
    #[arg(long = "download-root", global = true)]
    pub download_root: Option<String>,

    /// Hub endpoint used for collection lookups and snapshots
    #[arg(long, global = true, env = "HF_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
