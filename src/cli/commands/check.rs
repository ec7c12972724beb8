//! Check command implementation.
//!
//! The `eltflow check` command validates configuration without running
//! anything.

use crate::config::{validate_config, ConfigPaths};
use crate::error::Result;
use crate::runner::Workflow;
use crate::steps::ExtractLoadStep;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The check command implementation.
pub struct CheckCommand {
    source: ConfigSource,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(source: ConfigSource) -> Self {
        Self { source }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.source.config_override {
            Some(path) => ui.message(&format!("Checking {}", path.display())),
            None => {
                let paths = ConfigPaths::discover(&self.source.project_root);
                let existing = paths.all_existing();
                if existing.is_empty() {
                    ui.message("No project config found, checking built-in defaults");
                }
                for path in existing {
                    ui.message(&format!("Checking {}", path.display()));
                }
            }
        }

        let config = self.source.load()?;
        let errors = validate_config(&config);

        if !errors.is_empty() {
            for error in &errors {
                ui.error(&error.to_string());
            }
            ui.error(&format!("Found {} issue(s)", errors.len()));
            return Ok(CommandResult::failure(2));
        }

        // Catches problems the field rules cannot see, such as step ordering.
        let workflow = Workflow::from_config(&config)?;

        let script = ExtractLoadStep::from_config(&config.extract_load).script_path();
        if !script.exists() {
            ui.warning(&format!(
                "Script {} does not exist on this machine",
                script.display()
            ));
        }

        ui.success(&format!(
            "Configuration is valid ({} steps)",
            workflow.steps().len()
        ));
        Ok(CommandResult::success())
    }
}
