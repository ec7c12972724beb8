//! Workflow construction and execution.
//!
//! A [`Workflow`] is an explicit list of [`StepDefinition`]s checked into a
//! dependency order. [`WorkflowRunner`] executes it strictly sequentially:
//! a step starts only after its predecessor's process has exited and been
//! judged successful, and the first step that fails for good ends the run.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::EltConfig;
use crate::error::{EltError, Result};
use crate::steps::{
    pipeline_steps, ExecutionResult, Executors, StepDefinition, StepFailure, StepKind, StepStatus,
};

use super::dependency::{DependencyGraph, Edge};
use super::retry::RetryPolicy;
use super::state::WorkflowState;

/// A validated, ordered set of steps.
#[derive(Debug, Clone)]
pub struct Workflow {
    name: String,
    /// Steps in execution order.
    steps: Vec<StepDefinition>,
    graph: DependencyGraph,
}

impl Workflow {
    /// Build a workflow from explicit step definitions.
    ///
    /// Rejects empty workflows, duplicate names, unknown predecessors and
    /// cycles. A transform must run after an extract-load step, directly or
    /// through other steps, and the execution order must be one the
    /// [`WorkflowState`] machine accepts.
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition>) -> Result<Self> {
        let name = name.into();
        if steps.is_empty() {
            return Err(EltError::InvalidWorkflow {
                message: format!("workflow '{}' has no steps", name),
            });
        }

        let graph = steps
            .iter()
            .fold(DependencyGraph::builder(), |b, s| {
                b.add_step(s.name.clone(), s.depends_on.clone())
            })
            .build()?;
        let order = graph.topological_order()?;

        let mut remaining = steps;
        let mut ordered = Vec::with_capacity(remaining.len());
        for step_name in &order {
            if let Some(pos) = remaining.iter().position(|s| &s.name == step_name) {
                ordered.push(remaining.swap_remove(pos));
            }
        }

        check_transform_gating(&ordered, &graph)?;
        check_state_sequence(&ordered)?;

        Ok(Self {
            name,
            steps: ordered,
            graph,
        })
    }

    /// The extract-load then transform pipeline described by `config`.
    pub fn from_config(config: &EltConfig) -> Result<Self> {
        Self::new(config.name.clone(), pipeline_steps(config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph.edges()
    }

}

/// Every transform needs an extract-load step among its predecessors.
fn check_transform_gating(steps: &[StepDefinition], graph: &DependencyGraph) -> Result<()> {
    let gated: HashSet<String> = steps
        .iter()
        .filter(|s| s.action.kind() == StepKind::ExtractLoad)
        .flat_map(|s| graph.transitive_dependents(&s.name))
        .collect();

    match steps
        .iter()
        .find(|s| s.action.kind() == StepKind::Transform && !gated.contains(&s.name))
    {
        Some(step) => Err(EltError::InvalidWorkflow {
            message: format!(
                "transform step '{}' does not run after an extract-load step",
                step.name
            ),
        }),
        None => Ok(()),
    }
}

/// Walk the execution order through the state machine.
fn check_state_sequence(steps: &[StepDefinition]) -> Result<()> {
    let mut state = WorkflowState::Pending;
    for step in steps {
        state = state
            .start(step.action.kind())
            .map_err(|e| EltError::InvalidWorkflow {
                message: format!("step '{}' cannot run here: {}", step.name, e),
            })?;
    }
    Ok(())
}

/// Progress events emitted during workflow execution.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A step attempt is about to start.
    StepStarting {
        name: &'a str,
        index: usize,
        total: usize,
        attempt: u32,
    },
    /// An attempt failed and the step will run again after `delay`.
    StepRetrying {
        name: &'a str,
        attempt: u32,
        delay: Duration,
        failure: &'a StepFailure,
    },
    /// A step reached its final outcome.
    StepFinished {
        name: &'a str,
        record: &'a StepRecord,
    },
    /// A step never ran because an earlier one failed.
    StepNotRun { name: &'a str },
}

/// Final record of one step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: String,
    pub kind: StepKind,
    /// The last attempt.
    pub result: ExecutionResult,
    pub attempts: u32,
    /// Wall-clock time across all attempts, including retry delays.
    pub duration: Duration,
}

impl StepRecord {
    pub fn status(&self) -> StepStatus {
        self.result.status()
    }
}

/// Result of running a workflow.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub workflow: String,
    pub state: WorkflowState,
    /// Records for every step that ran, in execution order.
    pub steps: Vec<StepRecord>,
    /// Steps that never started.
    pub not_run: Vec<String>,
    pub duration: Duration,
}

impl WorkflowReport {
    pub fn succeeded(&self) -> bool {
        self.state == WorkflowState::Succeeded
    }

    /// The step that ended the run, if it failed.
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| !s.result.is_success())
    }

    /// Turn a failed run into the error of the step that failed it.
    pub fn into_result(self) -> Result<Self> {
        let failure = self
            .failed_step()
            .and_then(|r| r.result.outcome.failure().map(|f| (r.name.clone(), f.clone())));
        match failure {
            Some((step, f)) => Err(f.into_error(&step)),
            None => Ok(self),
        }
    }
}

/// Executes workflows one step at a time.
pub struct WorkflowRunner<'a> {
    executors: Executors<'a>,
    retry: RetryPolicy,
    sleep: fn(Duration),
}

impl<'a> WorkflowRunner<'a> {
    pub fn new(executors: Executors<'a>, retry: RetryPolicy) -> Self {
        Self {
            executors,
            retry,
            sleep: std::thread::sleep,
        }
    }

    /// Replace how the runner waits between attempts.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run the workflow.
    pub fn run(&self, workflow: &Workflow) -> Result<WorkflowReport> {
        self.run_with_progress(workflow, |_| {})
    }

    /// Describe each step's command without running anything.
    pub fn plan(&self, workflow: &Workflow) -> Vec<(String, String)> {
        workflow
            .steps()
            .iter()
            .map(|s| (s.name.clone(), s.action.describe(&self.executors)))
            .collect()
    }

    /// Run the workflow with a progress callback.
    ///
    /// `Err` is reserved for state machine violations; step failures are
    /// reported in the returned [`WorkflowReport`].
    pub fn run_with_progress<F>(
        &self,
        workflow: &Workflow,
        mut on_progress: F,
    ) -> Result<WorkflowReport>
    where
        F: FnMut(RunProgress<'_>),
    {
        let started = Instant::now();
        let total = workflow.steps().len();
        let mut state = WorkflowState::Pending;
        let mut records = Vec::with_capacity(total);
        let mut not_run = Vec::new();

        info!("Starting workflow {} ({} steps)", workflow.name(), total);

        for (index, step) in workflow.steps().iter().enumerate() {
            if state.is_failed() {
                not_run.push(step.name.clone());
                on_progress(RunProgress::StepNotRun { name: &step.name });
                continue;
            }

            let kind = step.action.kind();
            state = state.start(kind)?;
            info!("Step {} -> {}", step.name, state);

            let record = self.run_step(step, index, total, &mut on_progress);
            let success = record.result.is_success();
            on_progress(RunProgress::StepFinished {
                name: &step.name,
                record: &record,
            });
            records.push(record);

            if !success {
                state = state.fail(kind)?;
                warn!("Workflow {} stopped: {}", workflow.name(), state);
            }
        }

        if !state.is_failed() {
            state = state.succeed()?;
        }

        info!("Workflow {} finished: {}", workflow.name(), state);

        Ok(WorkflowReport {
            workflow: workflow.name().to_string(),
            state,
            steps: records,
            not_run,
            duration: started.elapsed(),
        })
    }

    fn run_step<F>(
        &self,
        step: &StepDefinition,
        index: usize,
        total: usize,
        on_progress: &mut F,
    ) -> StepRecord
    where
        F: FnMut(RunProgress<'_>),
    {
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            on_progress(RunProgress::StepStarting {
                name: &step.name,
                index,
                total,
                attempt,
            });

            let result = step.action.execute(&self.executors);

            let retry = match result.outcome.failure() {
                Some(failure) if self.retry.should_retry(failure, attempt) => {
                    warn!(
                        "Step {} failed (attempt {} of {}), retrying in {:?}: {}",
                        step.name,
                        attempt,
                        self.retry.max_attempts(),
                        self.retry.delay,
                        failure.diagnostic
                    );
                    on_progress(RunProgress::StepRetrying {
                        name: &step.name,
                        attempt,
                        delay: self.retry.delay,
                        failure,
                    });
                    true
                }
                _ => false,
            };

            if !retry {
                return StepRecord {
                    name: step.name.clone(),
                    kind: step.action.kind(),
                    result,
                    attempts: attempt,
                    duration: started.elapsed(),
                };
            }

            (self.sleep)(self.retry.delay);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryScope;
    use crate::shell::{CommandOptions, CommandResult, ProcessInvocation, ProcessRunner};
    use crate::steps::{
        BindMount, ContainerLauncher, ContainerSpec, ExtractLoadStep, FailureKind, StepAction,
        TransformStep,
    };
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Shared call log so ordering across both fakes can be asserted.
    type CallLog = RefCell<Vec<String>>;

    struct FakeProcesses<'l> {
        log: &'l CallLog,
        exits: RefCell<VecDeque<i32>>,
    }

    impl ProcessRunner for FakeProcesses<'_> {
        fn run(
            &self,
            _invocation: &ProcessInvocation,
            _options: &CommandOptions,
        ) -> Result<CommandResult> {
            self.log.borrow_mut().push("extract_load".to_string());
            let code = self.exits.borrow_mut().pop_front().unwrap_or(0);
            Ok(exit_with(code, "extract stdout", "extract stderr"))
        }
    }

    struct FakeContainers<'l> {
        log: &'l CallLog,
        specs: RefCell<Vec<ContainerSpec>>,
        exits: RefCell<VecDeque<i32>>,
    }

    impl ContainerLauncher for FakeContainers<'_> {
        fn launch(&self, spec: &ContainerSpec) -> Result<CommandResult> {
            self.log.borrow_mut().push("transform".to_string());
            self.specs.borrow_mut().push(spec.clone());
            let code = self.exits.borrow_mut().pop_front().unwrap_or(0);
            Ok(exit_with(code, "dbt stdout", "dbt stderr"))
        }
    }

    fn exit_with(code: i32, stdout: &str, stderr: &str) -> CommandResult {
        if code == 0 {
            CommandResult::success(stdout.into(), stderr.into(), Duration::ZERO)
        } else {
            CommandResult::failure(Some(code), stdout.into(), stderr.into(), Duration::ZERO)
        }
    }

    struct Harness {
        _temp: TempDir,
        script: PathBuf,
        log: CallLog,
    }

    impl Harness {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let script = temp.path().join("elt_script.py");
            std::fs::write(&script, "print('ok')\n").unwrap();
            Self {
                _temp: temp,
                script,
                log: RefCell::new(Vec::new()),
            }
        }

        fn processes(&self, exits: &[i32]) -> FakeProcesses<'_> {
            FakeProcesses {
                log: &self.log,
                exits: RefCell::new(exits.iter().copied().collect()),
            }
        }

        fn containers(&self, exits: &[i32]) -> FakeContainers<'_> {
            FakeContainers {
                log: &self.log,
                specs: RefCell::new(Vec::new()),
                exits: RefCell::new(exits.iter().copied().collect()),
            }
        }

        fn workflow(&self) -> Workflow {
            let dir = self.script.parent().unwrap().to_path_buf();
            Workflow::new(
                "elt_and_dbt",
                vec![
                    StepDefinition::new(
                        "run_elt_script",
                        StepAction::ExtractLoad(ExtractLoadStep::new(&self.script, dir, "python")),
                    ),
                    StepDefinition::new("dbt_run", StepAction::Transform(transform_step()))
                        .after("run_elt_script"),
                ],
            )
            .unwrap()
        }
    }

    fn transform_step() -> TransformStep {
        TransformStep::new(ContainerSpec {
            image: "ghcr.io/dbt-labs/dbt-postgres:1.4.7".into(),
            command: vec!["run".into(), "--full-refresh".into()],
            docker_url: "unix://var/run/docker.sock".into(),
            network: "elt_network".into(),
            mounts: vec![BindMount::new("/opt/dbt", "/dbt")],
            auto_remove: true,
        })
    }

    fn no_sleep(_: Duration) {}

    #[test]
    fn end_to_end_success_runs_each_step_once_in_order() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[0]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::Succeeded);
        assert!(report.succeeded());
        assert_eq!(*h.log.borrow(), vec!["extract_load", "transform"]);
        assert_eq!(report.steps.len(), 2);
        assert!(report.steps.iter().all(|s| s.attempts == 1));
        assert!(report.not_run.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn transform_never_runs_after_extract_load_failure() {
        let h = Harness::new();
        let processes = h.processes(&[1]);
        let containers = h.containers(&[]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::ExtractLoadFailed);
        assert!(containers.specs.borrow().is_empty());
        assert_eq!(*h.log.borrow(), vec!["extract_load"]);
        assert_eq!(report.not_run, vec!["dbt_run".to_string()]);

        match report.into_result() {
            Err(EltError::StepFailed {
                step, diagnostic, ..
            }) => {
                assert_eq!(step, "run_elt_script");
                assert_eq!(diagnostic, "extract stderr");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_script_stops_workflow_without_spawning() {
        let h = Harness::new();
        std::fs::remove_file(&h.script).unwrap();
        let processes = h.processes(&[]);
        let containers = h.containers(&[]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::ExtractLoadFailed);
        assert!(h.log.borrow().is_empty());
        let failure = report.steps[0].result.outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::MissingScript);
        assert!(matches!(
            report.into_result(),
            Err(EltError::MissingScript { .. })
        ));
    }

    #[test]
    fn transform_failure_is_reported() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[2]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::TransformFailed);
        assert_eq!(report.failed_step().unwrap().name, "dbt_run");
        assert_eq!(report.steps[1].result.exit_code, Some(2));
    }

    #[test]
    fn transform_receives_configured_spec() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[0]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        runner.run(&h.workflow()).unwrap();

        assert_eq!(*containers.specs.borrow(), vec![transform_step().spec]);
    }

    #[test]
    fn retry_recovers_from_single_failure() {
        let h = Harness::new();
        let processes = h.processes(&[1, 0]);
        let containers = h.containers(&[0]);
        let policy = RetryPolicy {
            retries: 1,
            delay: Duration::from_secs(300),
            scope: RetryScope::All,
        };
        let runner =
            WorkflowRunner::new(Executors::new(&processes, &containers), policy).with_sleep(no_sleep);

        let mut retries = Vec::new();
        let report = runner
            .run_with_progress(&h.workflow(), |p| {
                if let RunProgress::StepRetrying { name, attempt, .. } = p {
                    retries.push((name.to_string(), attempt));
                }
            })
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.steps[0].attempts, 2);
        assert_eq!(retries, vec![("run_elt_script".to_string(), 1)]);
        assert_eq!(
            *h.log.borrow(),
            vec!["extract_load", "extract_load", "transform"]
        );
    }

    #[test]
    fn retries_are_bounded() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[1, 1, 1, 1]);
        let policy = RetryPolicy {
            retries: 2,
            delay: Duration::ZERO,
            scope: RetryScope::All,
        };
        let runner =
            WorkflowRunner::new(Executors::new(&processes, &containers), policy).with_sleep(no_sleep);

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::TransformFailed);
        assert_eq!(report.steps[1].attempts, 3);
        assert_eq!(containers.specs.borrow().len(), 3);
    }

    #[test]
    fn infrastructure_scope_does_not_retry_genuine_failure() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[1, 0]);
        let policy = RetryPolicy {
            retries: 1,
            delay: Duration::ZERO,
            scope: RetryScope::Infrastructure,
        };
        let runner =
            WorkflowRunner::new(Executors::new(&processes, &containers), policy).with_sleep(no_sleep);

        let report = runner.run(&h.workflow()).unwrap();

        assert_eq!(report.state, WorkflowState::TransformFailed);
        assert_eq!(report.steps[1].attempts, 1);
    }

    #[test]
    fn infrastructure_scope_retries_engine_error() {
        let h = Harness::new();
        let processes = h.processes(&[0]);
        let containers = h.containers(&[125, 0]);
        let policy = RetryPolicy {
            retries: 1,
            delay: Duration::ZERO,
            scope: RetryScope::Infrastructure,
        };
        let runner =
            WorkflowRunner::new(Executors::new(&processes, &containers), policy).with_sleep(no_sleep);

        let report = runner.run(&h.workflow()).unwrap();

        assert!(report.succeeded());
        assert_eq!(report.steps[1].attempts, 2);
    }

    #[test]
    fn progress_events_follow_execution() {
        let h = Harness::new();
        let processes = h.processes(&[1]);
        let containers = h.containers(&[]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let mut events = Vec::new();
        runner
            .run_with_progress(&h.workflow(), |p| {
                events.push(match p {
                    RunProgress::StepStarting { name, .. } => format!("start {}", name),
                    RunProgress::StepRetrying { name, .. } => format!("retry {}", name),
                    RunProgress::StepFinished { name, record } => {
                        format!("finish {} {}", name, record.status())
                    }
                    RunProgress::StepNotRun { name } => format!("skip {}", name),
                })
            })
            .unwrap();

        assert_eq!(
            events,
            vec![
                "start run_elt_script",
                "finish run_elt_script failed",
                "skip dbt_run"
            ]
        );
    }

    #[test]
    fn workflow_orders_by_edges() {
        let workflow = Workflow::new(
            "reversed",
            vec![
                StepDefinition::new("dbt_run", StepAction::Transform(transform_step()))
                    .after("run_elt_script"),
                StepDefinition::new(
                    "run_elt_script",
                    StepAction::ExtractLoad(ExtractLoadStep::new("/x.py", "/", "python")),
                ),
            ],
        )
        .unwrap();

        let names: Vec<_> = workflow.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["run_elt_script", "dbt_run"]);
        assert_eq!(
            workflow.edges(),
            vec![Edge {
                from: "run_elt_script".into(),
                to: "dbt_run".into()
            }]
        );
    }

    #[test]
    fn transform_first_workflow_is_rejected() {
        let result = Workflow::new(
            "backwards",
            vec![
                StepDefinition::new("t", StepAction::Transform(transform_step())),
                StepDefinition::new(
                    "el",
                    StepAction::ExtractLoad(ExtractLoadStep::new("/x.py", "/", "python")),
                ),
            ],
        );
        match result {
            Err(EltError::InvalidWorkflow { message }) => assert!(message.contains("'t'")),
            other => panic!("expected InvalidWorkflow, got {:?}", other.map(|w| w.name().to_string())),
        }
    }

    #[test]
    fn transform_alone_is_rejected() {
        let result = Workflow::new(
            "dbt_only",
            vec![StepDefinition::new("dbt_run", StepAction::Transform(transform_step()))],
        );
        assert!(matches!(result, Err(EltError::InvalidWorkflow { .. })));
    }

    #[test]
    fn ungated_transform_is_rejected_even_in_order() {
        let result = Workflow::new(
            "no_edge",
            vec![
                StepDefinition::new(
                    "run_elt_script",
                    StepAction::ExtractLoad(ExtractLoadStep::new("/x.py", "/", "python")),
                ),
                StepDefinition::new("dbt_run", StepAction::Transform(transform_step())),
            ],
        );
        assert!(matches!(result, Err(EltError::InvalidWorkflow { .. })));
    }

    #[test]
    fn second_extract_load_is_rejected() {
        let el = |name: &str| {
            StepDefinition::new(
                name,
                StepAction::ExtractLoad(ExtractLoadStep::new("/x.py", "/", "python")),
            )
        };
        let result = Workflow::new("twice", vec![el("a"), el("b").after("a")]);
        match result {
            Err(EltError::InvalidWorkflow { message }) => {
                assert!(message.contains("EXTRACT_LOAD_RUNNING"))
            }
            other => panic!("expected InvalidWorkflow, got {:?}", other.map(|w| w.name().to_string())),
        }
    }

    #[test]
    fn extract_load_alone_is_accepted() {
        let workflow = Workflow::new(
            "load_only",
            vec![StepDefinition::new(
                "run_elt_script",
                StepAction::ExtractLoad(ExtractLoadStep::new("/x.py", "/", "python")),
            )],
        )
        .unwrap();
        assert_eq!(workflow.steps().len(), 1);
    }

    #[test]
    fn empty_workflow_is_rejected() {
        assert!(matches!(
            Workflow::new("empty", vec![]),
            Err(EltError::InvalidWorkflow { .. })
        ));
    }

    #[test]
    fn unknown_predecessor_is_rejected() {
        let result = Workflow::new(
            "broken",
            vec![StepDefinition::new("dbt_run", StepAction::Transform(transform_step()))
                .after("nowhere")],
        );
        assert!(matches!(result, Err(EltError::InvalidWorkflow { .. })));
    }

    #[test]
    fn from_config_builds_two_step_pipeline() {
        let workflow = Workflow::from_config(&EltConfig::default()).unwrap();
        assert_eq!(workflow.name(), "elt_and_dbt");
        assert_eq!(workflow.steps().len(), 2);
        assert_eq!(workflow.edges().len(), 1);
    }

    #[test]
    fn plan_describes_without_running() {
        let h = Harness::new();
        let processes = h.processes(&[]);
        let containers = h.containers(&[]);
        let runner = WorkflowRunner::new(
            Executors::new(&processes, &containers),
            RetryPolicy::none(),
        );

        let plan = runner.plan(&h.workflow());

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].0, "run_elt_script");
        assert!(plan[0].1.contains("python"));
        assert!(plan[1].1.contains("ghcr.io/dbt-labs/dbt-postgres:1.4.7"));
        assert!(h.log.borrow().is_empty());
    }
}
