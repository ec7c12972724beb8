//! Configuration schema definitions for eltflow.
//!
//! This module contains all the struct definitions that map to
//! the YAML configuration file format. Every field has a default, and the
//! defaults describe the stock `elt_and_dbt` pipeline, so an empty file is
//! a valid configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.eltflow/config.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EltConfig {
    /// Workflow identifier (for display and logging)
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning team or user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Date from which the workflow is considered active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Retry policy applied uniformly to every step
    pub retry: RetryConfig,

    /// Extraction/load script settings
    pub extract_load: ExtractLoadConfig,

    /// Containerized transform settings
    pub transform: TransformConfig,
}

impl Default for EltConfig {
    fn default() -> Self {
        Self {
            name: "elt_and_dbt".to_string(),
            description: Some("An ELT workflow with dbt".to_string()),
            owner: Some("airflow".to_string()),
            tags: vec!["elt".to_string(), "dbt".to_string()],
            start_date: NaiveDate::from_ymd_opt(2025, 8, 15),
            retry: RetryConfig::default(),
            extract_load: ExtractLoadConfig::default(),
            transform: TransformConfig::default(),
        }
    }
}

/// Which failures the retry policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryScope {
    /// Retry every failure, including genuine script or model errors.
    #[default]
    All,
    /// Retry only spawn failures and container engine errors.
    Infrastructure,
}

impl std::str::FromStr for RetryScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "infrastructure" | "infra" => Ok(Self::Infrastructure),
            _ => Err(format!("unknown retry scope: {}", s)),
        }
    }
}

impl std::fmt::Display for RetryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryScope::All => write!(f, "all"),
            RetryScope::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// Retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    pub retries: u32,

    /// Delay between attempts, in seconds
    pub delay_secs: u64,

    /// Which failures are retried
    pub retry_on: RetryScope,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 1,
            delay_secs: 300,
            retry_on: RetryScope::All,
        }
    }
}

/// Extraction/load step settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractLoadConfig {
    /// Step name
    pub step_name: String,

    /// Script to run
    pub script: PathBuf,

    /// Working directory for the script
    pub working_dir: PathBuf,

    /// Program used to run the script
    pub interpreter: String,
}

impl Default for ExtractLoadConfig {
    fn default() -> Self {
        Self {
            step_name: "run_elt_script".to_string(),
            script: PathBuf::from("/opt/airflow/elt_script/elt_script.py"),
            working_dir: PathBuf::from("/opt/airflow/elt_script"),
            interpreter: "python".to_string(),
        }
    }
}

/// Transform container settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Step name
    pub step_name: String,

    /// Image reference (`name:tag`)
    pub image: String,

    /// Arguments passed to the image entrypoint
    pub command: Vec<String>,

    /// Container engine socket address
    pub docker_url: String,

    /// Network the container joins
    pub network: String,

    /// Remove the container once it exits
    pub auto_remove: bool,

    /// Bind mounts (host path -> container path)
    pub mounts: Vec<MountConfig>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            step_name: "dbt_run".to_string(),
            image: "ghcr.io/dbt-labs/dbt-postgres:1.4.7".to_string(),
            command: [
                "run",
                "--profiles-dir",
                "/root",
                "--project-dir",
                "/dbt",
                "--full-refresh",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            docker_url: "unix://var/run/docker.sock".to_string(),
            network: "elt_network".to_string(),
            auto_remove: true,
            mounts: vec![
                MountConfig::bind("/opt/dbt", "/dbt"),
                MountConfig::bind("/root/.dbt", "/root"),
            ],
        }
    }
}

/// A single bind mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountConfig {
    /// Host path
    pub source: PathBuf,

    /// Path inside the container
    pub target: PathBuf,

    /// Mount read-only
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl MountConfig {
    /// Read-write bind mount.
    pub fn bind(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !b
}
