//! Step definitions and execution.
//!
//! A step is one unit of work with a name, an action, and the steps that
//! must succeed before it may start.
//!
//! - [`ExtractLoadStep`] runs a script as a subprocess
//! - [`TransformStep`] runs a container
//! - [`StepOutcome`] is the typed pass/fail result of one attempt

pub mod extract_load;
pub mod outcome;
pub mod transform;

pub use extract_load::ExtractLoadStep;
pub use outcome::{ExecutionResult, FailureKind, StepFailure, StepOutcome, StepStatus};
pub use transform::{BindMount, ContainerLauncher, ContainerSpec, DockerCliLauncher, TransformStep};

use crate::config::EltConfig;
use crate::shell::ProcessRunner;

/// Which kind of work a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    ExtractLoad,
    Transform,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::ExtractLoad => write!(f, "extract-load"),
            StepKind::Transform => write!(f, "transform"),
        }
    }
}

/// The action a step performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    ExtractLoad(ExtractLoadStep),
    Transform(TransformStep),
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::ExtractLoad(_) => StepKind::ExtractLoad,
            StepAction::Transform(_) => StepKind::Transform,
        }
    }

    /// Run one attempt of this action.
    pub fn execute(&self, executors: &Executors<'_>) -> ExecutionResult {
        match self {
            StepAction::ExtractLoad(step) => step.run(executors.processes),
            StepAction::Transform(step) => step.run(executors.containers),
        }
    }

    /// Command line this action would run, for dry runs.
    pub fn describe(&self, executors: &Executors<'_>) -> String {
        match self {
            StepAction::ExtractLoad(step) => format!(
                "(cd {} && {})",
                step.working_dir().display(),
                step.invocation().command_line()
            ),
            StepAction::Transform(step) => executors.containers.describe(&step.spec),
        }
    }
}

/// The collaborators that actually run processes and containers.
#[derive(Clone, Copy)]
pub struct Executors<'a> {
    pub processes: &'a dyn ProcessRunner,
    pub containers: &'a dyn ContainerLauncher,
}

impl<'a> Executors<'a> {
    pub fn new(processes: &'a dyn ProcessRunner, containers: &'a dyn ContainerLauncher) -> Self {
        Self {
            processes,
            containers,
        }
    }
}

/// A named step and its declared predecessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub name: String,
    pub action: StepAction,
    pub depends_on: Vec<String>,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
            depends_on: Vec::new(),
        }
    }

    /// Declare that `step` must succeed before this one starts.
    pub fn after(mut self, step: impl Into<String>) -> Self {
        self.depends_on.push(step.into());
        self
    }
}

/// The two-step pipeline described by `config`: extract-load, then transform.
pub fn pipeline_steps(config: &EltConfig) -> Vec<StepDefinition> {
    let el_name = config.extract_load.step_name.clone();
    vec![
        StepDefinition::new(
            el_name.clone(),
            StepAction::ExtractLoad(ExtractLoadStep::from_config(&config.extract_load)),
        ),
        StepDefinition::new(
            config.transform.step_name.clone(),
            StepAction::Transform(TransformStep::from_config(&config.transform)),
        )
        .after(el_name),
    ]
}
