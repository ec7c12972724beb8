//! Typed step outcomes.

use crate::error::EltError;
use std::path::PathBuf;
use std::time::Duration;

/// Status of a step in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step is waiting to run.
    Pending,

    /// Step is currently executing.
    Running,

    /// Step completed successfully.
    Completed,

    /// Step failed.
    Failed,

    /// Step never ran because a predecessor failed.
    NotRun,
}

impl StepStatus {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::NotRun
        )
    }

    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Pending => '○',
            StepStatus::Running => '◉',
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::NotRun => '⊘',
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::NotRun => "not run",
        };
        write!(f, "{}", s)
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The script to run does not exist.
    MissingScript,
    /// The process or container exited non-zero, or could not be started.
    StepFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::MissingScript => write!(f, "missing script"),
            FailureKind::StepFailed => write!(f, "step failed"),
        }
    }
}

/// Details of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub kind: FailureKind,

    /// Exit status, when a process actually ran to completion.
    pub exit_code: Option<i32>,

    /// Captured diagnostic text (stderr, or the reason nothing ran).
    pub diagnostic: String,

    /// Set when the failure came from the machinery around the step
    /// (spawn failure, container engine error) rather than the step's work.
    pub transient: bool,

    /// Script path for [`FailureKind::MissingScript`].
    pub script: Option<PathBuf>,
}

impl StepFailure {
    /// The script was not found; nothing was spawned.
    pub fn missing_script(path: PathBuf) -> Self {
        Self {
            kind: FailureKind::MissingScript,
            exit_code: None,
            diagnostic: format!("script not found at {}", path.display()),
            transient: false,
            script: Some(path),
        }
    }

    /// The step ran and exited non-zero.
    pub fn exited(exit_code: Option<i32>, diagnostic: String) -> Self {
        Self {
            kind: FailureKind::StepFailed,
            exit_code,
            diagnostic,
            transient: false,
            script: None,
        }
    }

    /// The step could not be started, or its runtime failed underneath it.
    pub fn infrastructure(exit_code: Option<i32>, diagnostic: String) -> Self {
        Self {
            transient: true,
            ..Self::exited(exit_code, diagnostic)
        }
    }

    /// Convert into the crate error for `step`.
    pub fn into_error(self, step: &str) -> EltError {
        match self.kind {
            FailureKind::MissingScript => EltError::MissingScript {
                path: self.script.unwrap_or_default(),
            },
            FailureKind::StepFailed => EltError::StepFailed {
                step: step.to_string(),
                code: self.exit_code,
                diagnostic: self.diagnostic,
            },
        }
    }
}

/// Pass/fail outcome of one step attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Exit status 0; carries the captured standard output.
    Success { output: String },
    /// Anything else.
    Failure(StepFailure),
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&StepFailure> {
        match self {
            StepOutcome::Failure(f) => Some(f),
            StepOutcome::Success { .. } => None,
        }
    }
}

/// Everything observed while running one attempt of a step.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub outcome: StepOutcome,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl ExecutionResult {
    /// A failure where no process produced output.
    pub fn not_started(failure: StepFailure) -> Self {
        Self {
            outcome: StepOutcome::Failure(failure),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            duration: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn status(&self) -> StepStatus {
        if self.is_success() {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        }
    }
}

/// Choose the text that best explains a failed process.
pub(crate) fn diagnostic_text(stdout: &str, stderr: &str, exit_code: Option<i32>) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    match exit_code {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    }
}
