//! CLI route: single route table and run context.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, WorkspaceCommands};
use crate::cli::presentation::{format_check_ok, format_init_report, format_workspace_info};
use crate::config::{AiricConfig, ConfigLoader};
use crate::error::ApiError;
use crate::init::{InitOptions, Initializer};
use crate::workspace::{absolute_path, WorkspaceContext};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded config plus the `--workspace` override.
pub struct RunContext {
    config: AiricConfig,
    workspace: Option<PathBuf>,
}

impl RunContext {
    /// Load config from `config_path` when given, otherwise from the layered sources.
    pub fn new(workspace: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::with_config(workspace, config))
    }

    pub fn with_config(workspace: Option<PathBuf>, config: AiricConfig) -> Self {
        Self { config, workspace }
    }

    pub fn config(&self) -> &AiricConfig {
        &self.config
    }

    /// Execute a command via the single route table. `None` starts the session.
    pub fn execute(&self, command: Option<&Commands>) -> Result<String, ApiError> {
        info!(command = %command_name(command), "Executing command");
        match command {
            None | Some(Commands::Repl) => self.handle_repl(),
            Some(Commands::Init {
                directory,
                name,
                description,
                force,
            }) => self.handle_init(
                directory.as_deref(),
                name.clone(),
                description.clone(),
                *force,
            ),
            Some(Commands::Workspace { command }) => self.handle_workspace_command(command),
            Some(Commands::Version) => Ok(format!("airic {}", env!("CARGO_PKG_VERSION"))),
        }
    }

    fn handle_repl(&self) -> Result<String, ApiError> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(crate::repl::start_repl(&self.config, self.workspace.clone()))?;
        Ok(String::new())
    }

    fn handle_init(
        &self,
        directory: Option<&Path>,
        name: Option<String>,
        description: Option<String>,
        force: bool,
    ) -> Result<String, ApiError> {
        let directory = match directory.or(self.workspace.as_deref()) {
            Some(dir) => absolute_path(dir),
            None => std::env::current_dir()?,
        };
        let options = InitOptions {
            name,
            description,
            ..InitOptions::default()
        };
        let initializer = Initializer::default();

        if force {
            let report = initializer.reinitialize(&directory, &options)?;
            return Ok(format_init_report(&report, true));
        }

        let report = initializer.initialize(&directory, &options)?;
        if report.is_already_initialized() && std::io::stdin().is_terminal() {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Workspace already initialized at {}. Rewrite configuration and templates?",
                    directory.display()
                ))
                .default(false)
                .interact()?;
            if confirmed {
                let report = initializer.reinitialize(&directory, &options)?;
                return Ok(format_init_report(&report, true));
            }
            debug!("Reinitialization declined");
        }
        Ok(format_init_report(&report, false))
    }

    fn handle_workspace_command(&self, command: &WorkspaceCommands) -> Result<String, ApiError> {
        let ctx = WorkspaceContext::acquire(self.workspace.as_deref())?;
        match command {
            WorkspaceCommands::Info => Ok(format_workspace_info(&ctx)),
            WorkspaceCommands::Check => Ok(format_check_ok(&ctx)),
        }
    }
}
