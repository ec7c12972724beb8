//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::RetryScope;

/// eltflow - Run an extract-load script, then a containerized dbt transform.
#[derive(Debug, Parser)]
#[command(name = "eltflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (replaces .eltflow/config.yml and config.local.yml)
    #[arg(short, long, global = true, env = "ELTFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the workflow (default if no command specified)
    Run(RunArgs),

    /// Validate configuration
    Check,

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Show execution order and step dependencies
    Plan,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Print each step's command without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override the number of retries per step
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Override the delay between attempts, in seconds
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// Which failures to retry: all, infrastructure
    #[arg(long, value_name = "SCOPE")]
    pub retry_on: Option<RetryScope>,

    /// Never use spinners or colors
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["eltflow"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "eltflow",
            "run",
            "--dry-run",
            "--retries",
            "3",
            "--retry-delay",
            "10",
            "--retry-on",
            "infrastructure",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.dry_run);
                assert_eq!(args.retries, Some(3));
                assert_eq!(args.retry_delay, Some(10));
                assert_eq!(args.retry_on, Some(RetryScope::Infrastructure));
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn invalid_retry_scope_rejected() {
        let result = Cli::try_parse_from(["eltflow", "run", "--retry-on", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["eltflow", "plan", "--project", "/srv/elt", "--quiet"]).unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/srv/elt")));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Plan)));
    }

    #[test]
    fn config_json_flag() {
        let cli = Cli::try_parse_from(["eltflow", "config", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(ConfigArgs { json: true }))));
    }
}
