//! Config defaults: applies sensible default values to parsed config.

use crate::schema::VidwatchConfig;
use std::path::PathBuf;

/// Frames sampled per question.
pub const DEFAULT_MAX_FRAMES: usize = 6;

/// Width cap for sampled frames, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 512;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Default max tokens for model responses.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

pub const DEFAULT_INPUT_FOLDER: &str = "videos";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: VidwatchConfig) -> VidwatchConfig {
    let config = apply_storage_defaults(config);
    let config = apply_model_defaults(config);
    let config = apply_sampling_defaults(config);
    apply_logging_defaults(config)
}

fn apply_storage_defaults(mut config: VidwatchConfig) -> VidwatchConfig {
    config
        .storage
        .input_folder
        .get_or_insert_with(|| PathBuf::from(DEFAULT_INPUT_FOLDER));
    config
}

/// Ensure provider, model and token limit are set.
fn apply_model_defaults(mut config: VidwatchConfig) -> VidwatchConfig {
    let model = &mut config.model;
    let provider = *model.provider.get_or_insert_with(Default::default);
    model
        .model
        .get_or_insert_with(|| provider.default_model().to_string());
    model.max_tokens.get_or_insert(DEFAULT_MAX_TOKENS);
    config
}

fn apply_sampling_defaults(mut config: VidwatchConfig) -> VidwatchConfig {
    let sampling = &mut config.sampling;
    sampling.max_frames.get_or_insert(DEFAULT_MAX_FRAMES);
    sampling.max_width.get_or_insert(DEFAULT_MAX_WIDTH);
    sampling.jpeg_quality.get_or_insert(DEFAULT_JPEG_QUALITY);
    sampling
        .ffmpeg_path
        .get_or_insert_with(|| DEFAULT_FFMPEG.to_string());
    sampling
        .ffprobe_path
        .get_or_insert_with(|| DEFAULT_FFPROBE.to_string());
    config
}

/// Ensure logging.level is set.
fn apply_logging_defaults(mut config: VidwatchConfig) -> VidwatchConfig {
    config
        .logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProviderKind;

    #[test]
    fn test_defaults_fill_empty_config() {
        let config = apply_all_defaults(VidwatchConfig::default());
        assert_eq!(config.sampling.max_frames, Some(6));
        assert_eq!(config.sampling.max_width, Some(512));
        assert_eq!(config.model.provider, Some(ProviderKind::OpenAi));
        assert_eq!(config.model.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
        assert_eq!(config.storage.input_folder, Some(PathBuf::from("videos")));
    }

    #[test]
    fn test_defaults_preserve_existing() {
        let mut config = VidwatchConfig::default();
        config.sampling.max_frames = Some(10);
        config.model.provider = Some(ProviderKind::Gemini);
        let config = apply_all_defaults(config);
        assert_eq!(config.sampling.max_frames, Some(10));
        assert_eq!(config.model.model.as_deref(), Some("gemini-2.0-flash"));
    }
}
