//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, workspace_command_name};
pub use output::map_error;
pub use parse::{Cli, Commands, WorkspaceCommands};
pub use presentation::{format_check_ok, format_init_report, format_workspace_info};
pub use route::RunContext;
