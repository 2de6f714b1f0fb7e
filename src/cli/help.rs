//! Command-name contract for logging.

use crate::cli::parse::{Commands, WorkspaceCommands};

/// Dotted command name (e.g. "workspace.check"); the default session is "repl".
pub fn command_name(command: Option<&Commands>) -> String {
    match command {
        None | Some(Commands::Repl) => "repl".to_string(),
        Some(Commands::Init { .. }) => "init".to_string(),
        Some(Commands::Workspace { command }) => {
            format!("workspace.{}", workspace_command_name(command))
        }
        Some(Commands::Version) => "version".to_string(),
    }
}

pub fn workspace_command_name(command: &WorkspaceCommands) -> &'static str {
    match command {
        WorkspaceCommands::Info => "info",
        WorkspaceCommands::Check => "check",
    }
}
