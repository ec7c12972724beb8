//! Transform step: run one container to completion.
//!
//! The step hands a [`ContainerSpec`] to a [`ContainerLauncher`] exactly as
//! configured. [`DockerCliLauncher`] is the production launcher and drives
//! the `docker` command-line client.

use std::path::PathBuf;

use crate::config::{MountConfig, TransformConfig};
use crate::error::Result;
use crate::shell::{CommandOptions, CommandResult, ProcessInvocation, ProcessRunner};

use super::outcome::{diagnostic_text, ExecutionResult, StepFailure, StepOutcome};

/// `docker run` exits 125 when the engine itself failed, 126 when the
/// container command could not be invoked and 127 when it was not found.
const DOCKER_ENGINE_ERRORS: std::ops::RangeInclusive<i32> = 125..=127;

/// A host path made visible inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    pub target: PathBuf,
    pub read_only: bool,
}

impl BindMount {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }
}

impl From<&MountConfig> for BindMount {
    fn from(m: &MountConfig) -> Self {
        Self {
            source: m.source.clone(),
            target: m.target.clone(),
            read_only: m.read_only,
        }
    }
}

/// Everything needed to launch the transform container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: String,
    pub command: Vec<String>,
    pub docker_url: String,
    pub network: String,
    pub mounts: Vec<BindMount>,
    pub auto_remove: bool,
}

impl From<&TransformConfig> for ContainerSpec {
    fn from(config: &TransformConfig) -> Self {
        Self {
            image: config.image.clone(),
            command: config.command.clone(),
            docker_url: config.docker_url.clone(),
            network: config.network.clone(),
            mounts: config.mounts.iter().map(BindMount::from).collect(),
            auto_remove: config.auto_remove,
        }
    }
}

/// Starts a container, waits for it, and reports its exit status.
pub trait ContainerLauncher {
    /// Run the container to completion.
    ///
    /// `Err` means the launch itself could not be attempted.
    fn launch(&self, spec: &ContainerSpec) -> Result<CommandResult>;

    /// One-line description of what `launch` would do, for dry runs.
    fn describe(&self, spec: &ContainerSpec) -> String {
        format!("run {} {}", spec.image, spec.command.join(" "))
    }
}

/// Launches containers through the `docker` CLI.
pub struct DockerCliLauncher<R> {
    runner: R,
    program: String,
}

impl<R: ProcessRunner> DockerCliLauncher<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "docker".to_string(),
        }
    }

    /// Use a different client binary (e.g. `podman`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Build the `docker run` invocation for `spec`.
    pub fn invocation(&self, spec: &ContainerSpec) -> ProcessInvocation {
        let mut args = Vec::new();

        if !spec.docker_url.is_empty() {
            args.push("--host".to_string());
            args.push(normalize_host(&spec.docker_url));
        }

        args.push("run".to_string());
        if spec.auto_remove {
            args.push("--rm".to_string());
        }
        if !spec.network.is_empty() {
            args.push("--network".to_string());
            args.push(spec.network.clone());
        }
        for mount in &spec.mounts {
            args.push("--mount".to_string());
            let mut value = format!(
                "type=bind,source={},target={}",
                mount.source.display(),
                mount.target.display()
            );
            if mount.read_only {
                value.push_str(",readonly");
            }
            args.push(value);
        }

        args.push(spec.image.clone());
        args.extend(spec.command.iter().cloned());

        ProcessInvocation::new(self.program.clone(), args)
    }
}

impl<R: ProcessRunner> ContainerLauncher for DockerCliLauncher<R> {
    fn launch(&self, spec: &ContainerSpec) -> Result<CommandResult> {
        let invocation = self.invocation(spec);
        tracing::info!("Launching container {} on {}", spec.image, spec.network);
        self.runner
            .run(&invocation, &CommandOptions::captured(None))
    }

    fn describe(&self, spec: &ContainerSpec) -> String {
        self.invocation(spec).command_line()
    }
}

/// `unix://var/run/docker.sock` names an absolute socket; the CLI wants three slashes.
fn normalize_host(url: &str) -> String {
    match url.strip_prefix("unix://") {
        Some(rest) if !rest.starts_with('/') => format!("unix:///{}", rest),
        _ => url.to_string(),
    }
}

/// Runs a [`ContainerSpec`] and interprets its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStep {
    pub spec: ContainerSpec,
}

impl TransformStep {
    pub fn new(spec: ContainerSpec) -> Self {
        Self { spec }
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        Self::new(ContainerSpec::from(config))
    }

    /// Launch the container once.
    pub fn run(&self, launcher: &dyn ContainerLauncher) -> ExecutionResult {
        let result = match launcher.launch(&self.spec) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Could not launch container {}: {}", self.spec.image, e);
                return ExecutionResult::not_started(StepFailure::infrastructure(
                    None,
                    e.to_string(),
                ));
            }
        };

        let outcome = if result.success {
            tracing::info!("Container {} exited successfully", self.spec.image);
            if !result.stdout.is_empty() {
                tracing::info!("{}", result.stdout.trim_end());
            }
            StepOutcome::Success {
                output: result.stdout.clone(),
            }
        } else {
            tracing::error!("STDOUT: {}", result.stdout.trim_end());
            tracing::error!("STDERR: {}", result.stderr.trim_end());
            let diagnostic = diagnostic_text(&result.stdout, &result.stderr, result.exit_code);
            let failure = if result.exit_code.is_some_and(|c| DOCKER_ENGINE_ERRORS.contains(&c)) {
                StepFailure::infrastructure(result.exit_code, diagnostic)
            } else {
                StepFailure::exited(result.exit_code, diagnostic)
            };
            StepOutcome::Failure(failure)
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
