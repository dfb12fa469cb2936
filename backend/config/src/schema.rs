//! Vidwatch configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every leaf is optional in the
//! file; [`crate::defaults`] fills the gaps and the accessors below fall back
//! to the same defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults::{
    DEFAULT_FFMPEG, DEFAULT_FFPROBE, DEFAULT_INPUT_FOLDER, DEFAULT_JPEG_QUALITY, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_FRAMES, DEFAULT_MAX_TOKENS, DEFAULT_MAX_WIDTH,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VidwatchConfig {
    /// Where videos are read from
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vision model used to answer questions
    #[serde(default)]
    pub model: ModelConfig,

    /// Frame sampling knobs
    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_folder: Option<PathBuf>,
}

impl StorageConfig {
    pub fn input_folder(&self) -> &Path {
        self.input_folder
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_INPUT_FOLDER))
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// OpenAI chat-completions, or anything compatible via `baseUrl`
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "gemini")]
    Gemini,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Gemini => "gemini-2.0-flash",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Override the provider endpoint (OpenRouter, Ollama, proxies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider().default_model())
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frames: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<u8>,
    /// Directory for temporary video copies; system temp dir if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<String>,
}

impl SamplingConfig {
    pub fn max_frames(&self) -> usize {
        self.max_frames.unwrap_or(DEFAULT_MAX_FRAMES)
    }

    pub fn max_width(&self) -> u32 {
        self.max_width.unwrap_or(DEFAULT_MAX_WIDTH)
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY)
    }

    pub fn ffmpeg_path(&self) -> &str {
        self.ffmpeg_path.as_deref().unwrap_or(DEFAULT_FFMPEG)
    }

    pub fn ffprobe_path(&self) -> &str {
        self.ffprobe_path.as_deref().unwrap_or(DEFAULT_FFPROBE)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling JSON log files; console only if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_keys_are_camel_case() {
        let config: VidwatchConfig = serde_yaml::from_str(
            "model:\n  provider: openai\n  apiKey: sk-x\n  baseUrl: http://localhost:11434/v1\nsampling:\n  jpegQuality: 70\n",
        )
        .unwrap();
        assert_eq!(config.model.api_key.as_deref(), Some("sk-x"));
        assert_eq!(config.model.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(config.sampling.jpeg_quality(), 70);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<VidwatchConfig, _> = serde_yaml::from_str("model:\n  provider: carrier-pigeon\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_model_defaults_follow_provider() {
        let model = ModelConfig {
            provider: Some(ProviderKind::Gemini),
            ..Default::default()
        };
        assert_eq!(model.model(), "gemini-2.0-flash");
        assert_eq!(ModelConfig::default().model(), "gpt-4o");
    }
}
