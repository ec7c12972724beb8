//! eltflow - a two-step ELT workflow runner.
//!
//! Runs an extraction/load script on the host, then a dbt transform inside
//! a container, strictly in that order. The transform only starts once the
//! script has exited successfully. Both steps share a retry policy.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Workflow graph, state machine, retries, and execution
//! - [`shell`] - Process execution
//! - [`steps`] - The extract-load and transform steps
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use eltflow::config::EltConfig;
//! use eltflow::runner::Workflow;
//!
//! let workflow = Workflow::from_config(&EltConfig::default()).unwrap();
//! let order: Vec<_> = workflow.steps().iter().map(|s| s.name.as_str()).collect();
//! assert_eq!(order, ["run_elt_script", "dbt_run"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{EltError, Result};
