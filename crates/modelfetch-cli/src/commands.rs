//! Available subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use modelfetch_core::Category;
use modelfetch_hub::CliFlavor;

#[derive(Subcommand)]
pub enum Commands {
    /// Download a model, selected files of a model, or every model of a collection
    Download {
        /// Model identifier (e.g. "unsloth/Llama-3-GGUF"), collection slug or collection URL
        identifier: String,
        /// Comma-separated relative file paths to download one by one
        #[arg(short, long)]
        files: Option<String>,
        /// Comma-separated relative file paths that must not end up on disk
        #[arg(short, long)]
        exclude: Option<String>,
        /// Destination category folder (see `modelfetch categories`)
        #[arg(short, long, default_value = "none", value_parser = Category::parse)]
        category: Category,
        /// Existing directory to download into instead of the category folder
        #[arg(long)]
        dest: Option<PathBuf>,
        /// Download the whole repository snapshot instead of selected files
        #[arg(long)]
        snapshot: bool,
        /// Access token; falls back to the credential environment variable
        #[arg(long)]
        token: Option<String>,
        /// Treat the identifier as a collection slug
        #[arg(long)]
        collection: bool,
        /// Look the collection up without sending a token
        #[arg(long)]
        public: bool,
        /// External CLI used for per-file downloads ("huggingface" or "modelscope")
        #[arg(long, default_value = "huggingface")]
        cli_flavor: CliFlavor,
    },

    /// List the model identifiers of a collection
    Collection {
        /// Collection URL or "namespace/slug"
        source: String,
        /// Look the collection up without sending a token
        #[arg(long)]
        public: bool,
    },

    /// List the available category folder names
    Categories,

    /// Show the resolved download root and default folder
    Paths,
}
