//! Run command implementation.
//!
//! The `eltflow run` command executes the workflow.

use std::time::Duration;

use crate::cli::args::RunArgs;
use crate::config::{ensure_valid, EltConfig};
use crate::error::Result;
use crate::runner::{RetryPolicy, RunProgress, StepRecord, Workflow, WorkflowReport, WorkflowRunner};
use crate::shell::SystemProcessRunner;
use crate::steps::{DockerCliLauncher, Executors};
use crate::ui::{format_duration, SpinnerHandle, UserInterface};

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The run command implementation.
pub struct RunCommand {
    source: ConfigSource,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(source: ConfigSource, args: RunArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Configured retry policy with command-line overrides applied.
    pub fn retry_policy(&self, config: &EltConfig) -> RetryPolicy {
        let mut policy = RetryPolicy::from(&config.retry);
        if let Some(retries) = self.args.retries {
            policy.retries = retries;
        }
        if let Some(secs) = self.args.retry_delay {
            policy.delay = Duration::from_secs(secs);
        }
        if let Some(scope) = self.args.retry_on {
            policy.scope = scope;
        }
        policy
    }

    /// Run `workflow` against the given executors, reporting through `ui`.
    pub fn run_workflow(
        &self,
        workflow: &Workflow,
        runner: &WorkflowRunner<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        if self.args.dry_run {
            ui.message("Running in dry-run mode - no commands will be executed");
            for (name, command) in runner.plan(workflow) {
                ui.message(&format!("  {}: {}", name, command));
            }
            return Ok(CommandResult::success());
        }

        let show_output = ui.output_mode().shows_command_output();
        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;

        let report = runner.run_with_progress(workflow, |event| match event {
            RunProgress::StepStarting {
                name,
                index,
                total,
                attempt,
            } => {
                let label = if attempt > 1 {
                    format!("[{}/{}] {} (attempt {})", index + 1, total, name, attempt)
                } else {
                    format!("[{}/{}] {}", index + 1, total, name)
                };
                match spinner.as_mut() {
                    Some(s) => s.set_message(&label),
                    None => spinner = Some(ui.start_spinner(&label)),
                }
            }
            RunProgress::StepRetrying {
                name,
                attempt,
                delay,
                failure,
            } => {
                if let Some(s) = spinner.as_mut() {
                    s.set_message(&format!(
                        "{} failed on attempt {} ({}), retrying in {}",
                        name,
                        attempt,
                        failure.kind,
                        format_duration(delay)
                    ));
                }
            }
            RunProgress::StepFinished { name, record } => {
                report_step(ui, spinner.take(), name, record, show_output);
            }
            RunProgress::StepNotRun { name } => {
                ui.message(&format!("  - {} not run", name));
            }
        })?;

        Ok(summarize(ui, &report))
    }
}

fn report_step(
    ui: &mut dyn UserInterface,
    spinner: Option<Box<dyn SpinnerHandle>>,
    name: &str,
    record: &StepRecord,
    show_output: bool,
) {
    let elapsed = format_duration(record.duration);
    match record.result.outcome.failure() {
        None => {
            let line = format!("{} ({})", name, elapsed);
            match spinner {
                Some(mut s) => s.finish_success(&line),
                None => ui.success(&line),
            }
            if show_output {
                ui.show_output("stdout", &record.result.stdout);
            }
        }
        Some(failure) => {
            let line = format!("{} {} ({})", name, failure.kind, elapsed);
            match spinner {
                Some(mut s) => s.finish_error(&line),
                None => ui.error(&line),
            }
            ui.show_output("STDOUT", &record.result.stdout);
            ui.show_output("STDERR", &record.result.stderr);
            if record.result.stdout.is_empty() && record.result.stderr.is_empty() {
                ui.error(&failure.diagnostic);
            }
        }
    }
}

fn summarize(ui: &mut dyn UserInterface, report: &WorkflowReport) -> CommandResult {
    let elapsed = format_duration(report.duration);
    if report.succeeded() {
        ui.success(&format!("Workflow {} succeeded in {}", report.workflow, elapsed));
        return CommandResult::success();
    }

    match report.failed_step() {
        Some(step) => ui.error(&format!(
            "Workflow {} failed at {} after {} attempt(s) [{}]",
            report.workflow, step.name, step.attempts, report.state
        )),
        None => ui.error(&format!("Workflow {} failed [{}]", report.workflow, report.state)),
    }
    CommandResult::failure(1)
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.source.load()?;
        ensure_valid(&config)?;
        let workflow = Workflow::from_config(&config)?;

        ui.show_header(&format!("Running {}", workflow.name()));

        let processes = SystemProcessRunner;
        let containers = DockerCliLauncher::new(SystemProcessRunner);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            self.retry_policy(&config),
        );

        self.run_workflow(&workflow, &runner, ui)
    }
}
