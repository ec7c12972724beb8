//! Configuration file discovery and loading.
//!
//! Layers, later overriding earlier:
//! 1. Built-in defaults (see [`EltConfig::default`])
//! 2. Project config (`.eltflow/config.yml`)
//! 3. Local overrides (`.eltflow/config.local.yml`)
//!
//! An explicit `--config` path replaces layers 2 and 3.

use crate::config::merger::merge_layers;
use crate::config::schema::EltConfig;
use crate::error::{EltError, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".eltflow";

/// Paths to configuration files in merge order.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .eltflow/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .eltflow/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Load a config file as a raw YAML value (for merging).
///
/// An empty file loads as an empty mapping.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EltError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EltError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| EltError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match value {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        Value::Mapping(_) => Ok(value),
        _ => Err(EltError::ConfigParseError {
            path: path.to_path_buf(),
            message: "top level must be a mapping".to_string(),
        }),
    }
}

/// Parse YAML content into [`EltConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<EltConfig> {
    if content.trim().is_empty() {
        return Ok(EltConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| EltError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn from_layers(layers: &[Value], source_path: &Path) -> Result<EltConfig> {
    serde_yaml::from_value(merge_layers(layers)).map_err(|e| EltError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge the project's config files over the built-in defaults.
///
/// A project without any config files runs the default pipeline.
pub fn load_merged_config(project_root: &Path) -> Result<EltConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();

    let Some(primary) = existing.first() else {
        tracing::debug!(
            "No config under {}, using built-in defaults",
            project_root.display()
        );
        return Ok(EltConfig::default());
    };

    let mut layers = Vec::with_capacity(existing.len());
    for path in &existing {
        tracing::debug!("Loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
    }

    from_layers(&layers, primary)
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file (over the
/// defaults). Otherwise, discovers and merges the project files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EltConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            from_layers(&[value], path)
        }
        None => load_merged_config(project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RetryScope;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = project_with(&[("config.yml", "name: x"), ("config.local.yml", "")]);
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, EltConfig::default());
    }

    #[test]
    fn local_override_merges_over_project() {
        let temp = project_with(&[
            (
                "config.yml",
                "name: nightly\nretry:\n  retries: 3\n  delay_secs: 60\n",
            ),
            ("config.local.yml", "retry:\n  delay_secs: 0\n"),
        ]);
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.name, "nightly");
        assert_eq!(config.retry.retries, 3);
        assert_eq!(config.retry.delay_secs, 0);
        assert_eq!(config.transform.network, "elt_network");
    }

    #[test]
    fn local_null_restores_built_in_default() {
        let temp = project_with(&[
            ("config.yml", "owner: data-team
"),
            ("config.local.yml", "owner: ~
"),
        ]);
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.owner, EltConfig::default().owner);
    }

    #[test]
    fn empty_project_file_is_defaults() {
        let temp = project_with(&[("config.yml", "")]);
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, EltConfig::default());
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = project_with(&[("config.yml", "retry: [unclosed")]);
        let err = load_merged_config(temp.path()).unwrap_err();
        match err {
            EltError::ConfigParseError { path, .. } => {
                assert!(path.ends_with("config.yml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_mapping_top_level_is_rejected() {
        let temp = project_with(&[("config.yml", "- a\n- b\n")]);
        assert!(matches!(
            load_merged_config(temp.path()),
            Err(EltError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn override_path_skips_project_files() {
        let temp = project_with(&[("config.yml", "name: project")]);
        let other = temp.path().join("other.yml");
        fs::write(&other, "retry:\n  retry_on: infrastructure\n").unwrap();

        let config = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.name, "elt_and_dbt");
        assert_eq!(config.retry.retry_on, RetryScope::Infrastructure);
    }

    #[test]
    fn override_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        assert!(matches!(
            load_config(temp.path(), Some(&missing)),
            Err(EltError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn parse_config_accepts_blank_content() {
        let config = parse_config("   \n", Path::new("inline.yml")).unwrap();
        assert_eq!(config, EltConfig::default());
    }
}
