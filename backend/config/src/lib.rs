//! `vidwatch-config` — runtime configuration for the vidwatch tool.
//!
//! Provides:
//! - Typed config schema (storage, model provider, sampling, logging)
//! - YAML loading with a defaults fallback when no file exists
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use redact::redact;
pub use schema::{LoggingConfig, ModelConfig, ProviderKind, SamplingConfig, StorageConfig, VidwatchConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::path::Path;

/// Load, apply env substitution, apply defaults, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// findings are logged; callers that need to act on them run [`validate`].
pub async fn load_and_prepare(path: &Path) -> Result<VidwatchConfig> {
    let raw = load_config(path).await?;

    let value = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;

    let config: VidwatchConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}
