//! Config validation: schema checks with user-friendly error messages.

use crate::defaults::DEFAULT_MAX_WIDTH;
use crate::schema::{ProviderKind, VidwatchConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &VidwatchConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_model(config, &mut report);
    validate_sampling(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_model(config: &VidwatchConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if model.model().trim().is_empty() {
        report.error("model.model", "Model id cannot be empty");
    }
    if model.max_tokens() == 0 {
        report.error("model.maxTokens", "maxTokens must be greater than 0");
    }

    let has_key = model.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    match model.provider() {
        ProviderKind::Gemini if !has_key => {
            report.error("model.apiKey", "Gemini requires an API key");
        }
        // A custom endpoint (e.g. local Ollama) may not need credentials.
        ProviderKind::OpenAi if !has_key && model.base_url.is_none() => {
            report.warn("model.apiKey", "No API key configured; vision calls will fail");
        }
        _ => {}
    }

    if let Some(url) = &model.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("model.baseUrl", format!("'{url}' is not an http(s) URL"));
        }
    }
}

fn validate_sampling(config: &VidwatchConfig, report: &mut ValidationReport) {
    let sampling = &config.sampling;
    if sampling.max_frames() == 0 {
        report.error("sampling.maxFrames", "maxFrames must be at least 1");
    } else if sampling.max_frames() > 32 {
        report.warn(
            "sampling.maxFrames",
            "More than 32 frames per question is slow and expensive",
        );
    }
    if !(1..=DEFAULT_MAX_WIDTH).contains(&sampling.max_width()) {
        report.error(
            "sampling.maxWidth",
            format!("maxWidth must be between 1 and {DEFAULT_MAX_WIDTH}"),
        );
    }
    if !(1..=100).contains(&sampling.jpeg_quality()) {
        report.error("sampling.jpegQuality", "jpegQuality must be between 1 and 100");
    }
    if let Some(dir) = &sampling.temp_dir {
        if !dir.is_dir() {
            report.warn(
                "sampling.tempDir",
                format!("{} is not an existing directory", dir.display()),
            );
        }
    }
}

fn validate_logging(config: &VidwatchConfig, report: &mut ValidationReport) {
    let level = config.logging.level();
    let known = ["trace", "debug", "info", "warn", "error", "off"];
    // Anything with a directive syntax is left to EnvFilter.
    if !known.contains(&level.to_ascii_lowercase().as_str()) && !level.contains('=') {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;

    #[test]
    fn default_config_only_warns_about_key() {
        let report = validate(&apply_all_defaults(VidwatchConfig::default()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "model.apiKey");
    }

    #[test]
    fn zero_frames_is_error() {
        let mut cfg = VidwatchConfig::default();
        cfg.sampling.max_frames = Some(0);
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "sampling.maxFrames");
    }

    #[test]
    fn width_above_ceiling_is_error() {
        for width in [0, 513, 4096] {
            let mut cfg = VidwatchConfig::default();
            cfg.model.api_key = Some("sk-x".into());
            cfg.sampling.max_width = Some(width);
            let report = validate(&cfg);
            assert_eq!(report.errors.len(), 1, "width = {width}");
            assert_eq!(report.errors[0].path, "sampling.maxWidth");
        }

        let mut cfg = VidwatchConfig::default();
        cfg.sampling.max_width = Some(320);
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn gemini_without_key_is_error() {
        let mut cfg = VidwatchConfig::default();
        cfg.model.provider = Some(ProviderKind::Gemini);
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "model.apiKey"));
    }

    #[test]
    fn local_endpoint_needs_no_key() {
        let mut cfg = VidwatchConfig::default();
        cfg.model.base_url = Some("http://localhost:11434/v1".to_string());
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn bad_quality_and_url() {
        let mut cfg = VidwatchConfig::default();
        cfg.sampling.jpeg_quality = Some(0);
        cfg.model.api_key = Some("sk-x".into());
        cfg.model.base_url = Some("ftp://example.com".into());
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }
}
