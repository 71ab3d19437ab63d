//! CLI definitions for scmd.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// scmd CLI.
#[derive(Parser)]
#[command(name = "scmd")]
#[command(about = "Personal command store with keyword, vector and AI search")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.scmd/config.toml)
    #[arg(short, long, global = true, env = "SCMD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Search the store, asking an AI provider when keyword matches are weak
    Search {
        /// Free-form query; spaces mean AND, commas mean OR
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Keyword search only
        #[arg(long)]
        no_ai: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Interactive prompt (default)
    Interactive {
        /// Keyword search only
        #[arg(long)]
        no_ai: bool,
    },

    /// Add a command
    Add {
        /// Command text
        key: String,
        /// Description
        data: String,
    },

    /// Add a command, stripping Markdown code fences from the description
    Save {
        /// Command text
        key: String,
        /// Description
        data: String,
    },

    /// Import a Markdown document as one command
    Import {
        /// Path to a .md file
        file: PathBuf,
    },

    /// List the most recent commands
    List {
        /// Number of commands to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show one command by id
    Show {
        /// Command id
        id: i64,
    },

    /// Delete a command by id
    Delete {
        /// Command id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the number of stored commands
    Count,

    /// Generate embeddings for commands stored without one
    Embed,

    /// Show embedding coverage
    Stats,

    /// Show provider availability and configuration
    Status {
        /// Check every provider again instead of using the startup result
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
