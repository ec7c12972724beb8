//! Process execution and environment detection.

pub mod command;
pub mod platform;

pub use command::{
    execute, CommandOptions, CommandResult, ProcessInvocation, ProcessRunner,
    SystemProcessRunner,
};
pub use platform::is_ci;
