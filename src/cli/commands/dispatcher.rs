//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, EltConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Configuration and workflow errors are returned as `Err` so the
    /// caller can map them to an exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command finds its configuration.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub project_root: PathBuf,
    pub config_override: Option<PathBuf>,
}

impl ConfigSource {
    pub fn new(project_root: &Path, config_override: Option<&Path>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
        }
    }

    /// Load the layered configuration.
    pub fn load(&self) -> Result<EltConfig> {
        load_config(&self.project_root, self.config_override.as_deref())
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: ConfigSource,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            source: ConfigSource {
                project_root,
                config_override: None,
            },
        }
    }

    /// Load configuration from this file instead of the project's.
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.source.config_override = config;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.source.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(self.source.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Check) => super::check::CheckCommand::new(self.source.clone()).execute(ui),
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(self.source.clone(), args.clone()).execute(ui)
            }
            Some(Commands::Plan) => super::plan::PlanCommand::new(self.source.clone()).execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(self.source.clone(), RunArgs::default()).execute(ui),
        }
    }
}
