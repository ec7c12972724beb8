//! Plan command implementation.
//!
//! The `eltflow plan` command prints the execution order, the dependency
//! edges, and the command each step would run.

use crate::config::ensure_valid;
use crate::error::Result;
use crate::runner::{RetryPolicy, Workflow, WorkflowRunner};
use crate::shell::SystemProcessRunner;
use crate::steps::{DockerCliLauncher, Executors};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The plan command implementation.
pub struct PlanCommand {
    source: ConfigSource,
}

impl PlanCommand {
    /// Create a new plan command.
    pub fn new(source: ConfigSource) -> Self {
        Self { source }
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        ensure_valid(&config)?;
        let workflow = Workflow::from_config(&config)?;

        let processes = SystemProcessRunner;
        let containers = DockerCliLauncher::new(SystemProcessRunner);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::from(&config.retry),
        );

        ui.show_header(&format!("Plan for {}", workflow.name()));

        ui.message("Execution order:");
        for (index, (name, command)) in runner.plan(&workflow).into_iter().enumerate() {
            ui.message(&format!("  {}. {}", index + 1, name));
            ui.message(&format!("     {}", command));
        }

        ui.message("");
        ui.message("Dependencies:");
        for edge in workflow.edges() {
            ui.message(&format!("  {} >> {}", edge.from, edge.to));
        }

        let retry = runner.retry_policy();
        ui.message("");
        ui.message(&format!(
            "Retries: {} (delay {}s, on {})",
            retry.retries,
            retry.delay.as_secs(),
            retry.scope
        ));

        Ok(CommandResult::success())
    }
}
