//! Error types for eltflow operations.
//!
//! This module defines [`EltError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! Step failures are first reported as typed
//! [`StepOutcome`](crate::steps::StepOutcome) values. They only become an
//! `EltError` once the workflow has given up on them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for eltflow operations.
#[derive(Debug, Error)]
pub enum EltError {
    /// The extraction/load script does not exist. Raised before any process is spawned.
    #[error("Script not found at {path}")]
    MissingScript { path: PathBuf },

    /// A subprocess or container exited with a non-zero status.
    #[error("Step '{step}' failed with exit code {code:?}: {diagnostic}")]
    StepFailed {
        step: String,
        code: Option<i32>,
        diagnostic: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Workflow definition is malformed (duplicate or unknown steps).
    #[error("Invalid workflow: {message}")]
    InvalidWorkflow { message: String },

    /// Step dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// The workflow state machine was asked to make an illegal move.
    #[error("Invalid workflow transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// A process could not be spawned or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EltError {
    /// Process exit code the CLI should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            EltError::ConfigNotFound { .. }
            | EltError::ConfigParseError { .. }
            | EltError::ConfigValidationError { .. }
            | EltError::InvalidWorkflow { .. }
            | EltError::CircularDependency { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for eltflow operations.
pub type Result<T> = std::result::Result<T, EltError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_displays_path() {
        let err = EltError::MissingScript {
            path: PathBuf::from("/opt/airflow/elt_script/elt_script.py"),
        };
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("/opt/airflow/elt_script/elt_script.py"));
    }

    #[test]
    fn step_failed_displays_step_code_and_diagnostic() {
        let err = EltError::StepFailed {
            step: "run_elt_script".into(),
            code: Some(3),
            diagnostic: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("run_elt_script"));
        assert!(msg.contains("3"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = EltError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn circular_dependency_displays_cycle() {
        let err = EltError::CircularDependency {
            cycle: "a -> b -> a".into(),
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn invalid_transition_names_state_and_event() {
        let err = EltError::InvalidTransition {
            from: "SUCCEEDED".into(),
            event: "start dbt_run".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SUCCEEDED"));
        assert!(msg.contains("start dbt_run"));
    }

    #[test]
    fn config_errors_use_exit_code_two() {
        let err = EltError::ConfigValidationError {
            message: "bad".into(),
        };
        assert_eq!(err.exit_code(), 2);
        let err = EltError::CircularDependency { cycle: "x".into() };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn step_errors_use_exit_code_one() {
        let err = EltError::MissingScript {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.exit_code(), 1);
        let err = EltError::StepFailed {
            step: "dbt_run".into(),
            code: Some(1),
            diagnostic: String::new(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EltError = io_err.into();
        assert!(matches!(err, EltError::Io(_)));
    }
}
