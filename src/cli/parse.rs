//! CLI parse: clap types for Airic. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Airic - document-driven AI collaboration in a Markdown workspace
#[derive(Parser, Debug)]
#[command(name = "airic")]
#[command(about = "Document-driven AI collaboration in a Markdown workspace")]
pub struct Cli {
    /// Defaults to the interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workspace root (default: discovered from the current directory)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive session
    Repl,
    /// Initialize a workspace
    Init {
        /// Directory to initialize (default: current directory)
        directory: Option<PathBuf>,
        /// Workspace name written to the config
        #[arg(long)]
        name: Option<String>,
        /// Workspace description written to the config
        #[arg(long)]
        description: Option<String>,
        /// Rewrite config and templates even if already initialized
        #[arg(long)]
        force: bool,
    },
    /// Workspace commands (info, check)
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Print the version
    Version,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceCommands {
    /// Show root, config, and templates
    Info,
    /// Validate the workspace structure
    Check,
}
