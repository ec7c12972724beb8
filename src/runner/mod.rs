//! Step execution orchestration.

pub mod dependency;
pub mod retry;
pub mod state;
pub mod workflow;

pub use dependency::{DependencyGraph, DependencyGraphBuilder, Edge};
pub use retry::RetryPolicy;
pub use state::WorkflowState;
pub use workflow::{RunProgress, StepRecord, Workflow, WorkflowReport, WorkflowRunner};
