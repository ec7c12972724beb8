//! Configuration loading, layering, and validation.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{load_config, load_merged_config, parse_config, ConfigPaths, CONFIG_DIR};
pub use merger::{deep_merge, merge_layers};
pub use schema::{
    EltConfig, ExtractLoadConfig, MountConfig, RetryConfig, RetryScope, TransformConfig,
};
pub use validator::{ensure_valid, validate_config, ValidationError};
