//! Configuration validation rules.
//!
//! Validation collects every issue instead of stopping at the first one.

use crate::config::schema::EltConfig;
use crate::error::{EltError, Result};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: &'static str,
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &'static str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} [{}]", self.field, self.message, self.rule)
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &EltConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-field",
            "name",
            "workflow name must not be empty",
        ));
    }

    errors.extend(validate_extract_load(config));
    errors.extend(validate_transform(config));

    if config.extract_load.step_name == config.transform.step_name {
        errors.push(ValidationError::new(
            "duplicate-step",
            "transform.step_name",
            format!(
                "step name '{}' is used by both steps",
                config.transform.step_name
            ),
        ));
    }

    errors
}

/// Validate and convert the first batch of issues into an error.
pub fn ensure_valid(config: &EltConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    Err(EltError::ConfigValidationError {
        message: errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    })
}

fn validate_extract_load(config: &EltConfig) -> Vec<ValidationError> {
    let el = &config.extract_load;
    let mut errors = Vec::new();

    if el.step_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-field",
            "extract_load.step_name",
            "step name must not be empty",
        ));
    }
    if el.script.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "empty-field",
            "extract_load.script",
            "script path must not be empty",
        ));
    }
    if el.interpreter.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-field",
            "extract_load.interpreter",
            "interpreter must not be empty",
        ));
    }

    errors
}

fn validate_transform(config: &EltConfig) -> Vec<ValidationError> {
    let t = &config.transform;
    let mut errors = Vec::new();

    for (field, value) in [
        ("transform.step_name", &t.step_name),
        ("transform.image", &t.image),
        ("transform.docker_url", &t.docker_url),
        ("transform.network", &t.network),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-field",
                field,
                "value must not be empty",
            ));
        }
    }

    if t.image.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(
            "invalid-image",
            "transform.image",
            format!("image reference '{}' contains whitespace", t.image),
        ));
    }

    if t.command.is_empty() {
        errors.push(ValidationError::new(
            "empty-command",
            "transform.command",
            "container command must have at least one argument",
        ));
    }

    let mut targets = HashSet::new();
    for (i, mount) in t.mounts.iter().enumerate() {
        let field = format!("transform.mounts[{}]", i);
        if !mount.source.is_absolute() {
            errors.push(ValidationError::new(
                "relative-mount",
                field.clone(),
                format!("source '{}' must be absolute", mount.source.display()),
            ));
        }
        if !mount.target.is_absolute() {
            errors.push(ValidationError::new(
                "relative-mount",
                field.clone(),
                format!("target '{}' must be absolute", mount.target.display()),
            ));
        }
        if !targets.insert(&mount.target) {
            errors.push(ValidationError::new(
                "duplicate-mount",
                field,
                format!("target '{}' is mounted twice", mount.target.display()),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MountConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&EltConfig::default()).is_empty());
        assert!(ensure_valid(&EltConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_issue() {
        let mut config = EltConfig::default();
        config.transform.image = String::new();
        config.transform.network = String::new();
        config.transform.command.clear();
        config.extract_load.interpreter = " ".to_string();

        let errors = validate_config(&config);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"transform.image"));
        assert!(fields.contains(&"transform.network"));
        assert!(fields.contains(&"transform.command"));
        assert!(fields.contains(&"extract_load.interpreter"));
    }

    #[test]
    fn relative_mount_paths_are_rejected() {
        let mut config = EltConfig::default();
        config.transform.mounts = vec![MountConfig::bind("dbt", "/dbt")];

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "relative-mount");
        assert!(errors[0].message.contains("dbt"));
    }

    #[test]
    fn duplicate_mount_targets_are_rejected() {
        let mut config = EltConfig::default();
        config.transform.mounts = vec![
            MountConfig::bind("/a", "/dbt"),
            MountConfig::bind("/b", "/dbt"),
        ];

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "duplicate-mount"));
    }

    #[test]
    fn image_with_whitespace_is_rejected() {
        let mut config = EltConfig::default();
        config.transform.image = "dbt postgres".to_string();
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "invalid-image"));
    }

    #[test]
    fn shared_step_name_is_rejected() {
        let mut config = EltConfig::default();
        config.transform.step_name = config.extract_load.step_name.clone();
        assert!(validate_config(&config)
            .iter()
            .any(|e| e.rule == "duplicate-step"));
    }

    #[test]
    fn ensure_valid_joins_messages() {
        let mut config = EltConfig::default();
        config.name = String::new();
        config.transform.network = String::new();

        let err = ensure_valid(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("transform.network"));
    }
}
