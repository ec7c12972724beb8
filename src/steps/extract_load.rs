//! Extraction/load step: run a script as a child process.

use std::path::{Path, PathBuf};

use crate::config::ExtractLoadConfig;
use crate::shell::{CommandOptions, ProcessInvocation, ProcessRunner};

use super::outcome::{diagnostic_text, ExecutionResult, StepFailure, StepOutcome};

/// Runs `<interpreter> <script>` inside `working_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractLoadStep {
    pub script: PathBuf,
    pub working_dir: PathBuf,
    pub interpreter: String,
}

impl ExtractLoadStep {
    pub fn new(
        script: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        interpreter: impl Into<String>,
    ) -> Self {
        Self {
            script: script.into(),
            working_dir: working_dir.into(),
            interpreter: interpreter.into(),
        }
    }

    pub fn from_config(config: &ExtractLoadConfig) -> Self {
        Self::new(
            config.script.clone(),
            config.working_dir.clone(),
            config.interpreter.clone(),
        )
    }

    /// The process this step spawns.
    pub fn invocation(&self) -> ProcessInvocation {
        ProcessInvocation::new(
            self.interpreter.clone(),
            vec![self.script.to_string_lossy().to_string()],
        )
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Where the child process will find the script.
    ///
    /// A relative script is resolved against `working_dir`, the directory
    /// the child runs in. An absolute script is returned unchanged.
    pub fn script_path(&self) -> PathBuf {
        self.working_dir.join(&self.script)
    }

    /// Run the script once.
    ///
    /// Fails with `MissingScript` before spawning anything if the script is
    /// absent. Captured output is logged before a failure is returned.
    pub fn run(&self, runner: &dyn ProcessRunner) -> ExecutionResult {
        let script = self.script_path();
        if !script.exists() {
            tracing::error!("ELT script not found at {}", script.display());
            return ExecutionResult::not_started(StepFailure::missing_script(script));
        }

        let invocation = self.invocation();
        let options = CommandOptions::captured(Some(self.working_dir.clone()));

        let result = match runner.run(&invocation, &options) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Could not start ELT script: {}", e);
                return ExecutionResult::not_started(StepFailure::infrastructure(
                    None,
                    e.to_string(),
                ));
            }
        };

        let outcome = if result.success {
            tracing::info!("ELT script completed successfully");
            if !result.stdout.is_empty() {
                tracing::info!("{}", result.stdout.trim_end());
            }
            StepOutcome::Success {
                output: result.stdout.clone(),
            }
        } else {
            tracing::error!("STDOUT: {}", result.stdout.trim_end());
            tracing::error!("STDERR: {}", result.stderr.trim_end());
            StepOutcome::Failure(StepFailure::exited(
                result.exit_code,
                diagnostic_text(&result.stdout, &result.stderr, result.exit_code),
            ))
        };

        ExecutionResult {
            outcome,
            stdout: result.stdout,
            stderr: result.stderr,
            exit_code: result.exit_code,
            duration: result.duration,
        }
    }
}
