//! Workflow state machine.
//!
//! ```text
//! PENDING -> EXTRACT_LOAD_RUNNING -> EXTRACT_LOAD_FAILED
//!                                 -> TRANSFORM_RUNNING -> TRANSFORM_FAILED
//!                                                      -> SUCCEEDED
//! ```
//!
//! Extract-load may only start from `PENDING`. Transform may only start
//! while extract-load is running, which records that extract-load
//! succeeded. Every other move is an `InvalidTransition`.

use crate::error::{EltError, Result};
use crate::steps::StepKind;

/// Where a workflow run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Pending,
    ExtractLoadRunning,
    ExtractLoadFailed,
    TransformRunning,
    TransformFailed,
    Succeeded,
}

impl WorkflowState {
    fn running(kind: StepKind) -> Self {
        match kind {
            StepKind::ExtractLoad => Self::ExtractLoadRunning,
            StepKind::Transform => Self::TransformRunning,
        }
    }

    fn failed(kind: StepKind) -> Self {
        match kind {
            StepKind::ExtractLoad => Self::ExtractLoadFailed,
            StepKind::Transform => Self::TransformFailed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ExtractLoadFailed | Self::TransformFailed | Self::Succeeded
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::ExtractLoadRunning | Self::TransformRunning)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::ExtractLoadFailed | Self::TransformFailed)
    }

    /// A step of `kind` begins.
    pub fn start(self, kind: StepKind) -> Result<Self> {
        match (self, kind) {
            (Self::Pending, StepKind::ExtractLoad)
            | (Self::ExtractLoadRunning, StepKind::Transform) => Ok(Self::running(kind)),
            _ => Err(self.invalid(format!("start {}", kind))),
        }
    }

    /// The running step of `kind` failed for good.
    pub fn fail(self, kind: StepKind) -> Result<Self> {
        if self == Self::running(kind) {
            Ok(Self::failed(kind))
        } else {
            Err(self.invalid(format!("fail {}", kind)))
        }
    }

    /// The last step succeeded.
    pub fn succeed(self) -> Result<Self> {
        if self.is_running() {
            Ok(Self::Succeeded)
        } else {
            Err(self.invalid("succeed".to_string()))
        }
    }

    fn invalid(self, event: String) -> EltError {
        EltError::InvalidTransition {
            from: self.to_string(),
            event,
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::ExtractLoadRunning => "EXTRACT_LOAD_RUNNING",
            Self::ExtractLoadFailed => "EXTRACT_LOAD_FAILED",
            Self::TransformRunning => "TRANSFORM_RUNNING",
            Self::TransformFailed => "TRANSFORM_FAILED",
            Self::Succeeded => "SUCCEEDED",
        };
        write!(f, "{}", s)
    }
}
