//! Wires configured collaborators into a ready-to-run tool.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use vidwatch_config::{validate, ProviderKind, VidwatchConfig};
use vidwatch_core::LlmProvider;
use vidwatch_media::{FfmpegDecoder, FrameSampler, SamplerOptions};
use vidwatch_tools::{LocalFolderStorage, VideoAnalysisTool};
use vidwatch_understanding::{GeminiVisionProvider, OpenAiVisionProvider};

/// Refuse to run with a config that has validation errors.
pub fn ensure_valid(config: &VidwatchConfig) -> Result<()> {
    let report = validate(config);
    match report.errors.as_slice() {
        [] => Ok(()),
        [only] => bail!("{only}"),
        [first, rest @ ..] => bail!("{first} (and {} more)", rest.len()),
    }
}

pub fn build_provider(config: &VidwatchConfig) -> Arc<dyn LlmProvider> {
    let model = &config.model;
    let api_key = model.api_key.clone().unwrap_or_default();

    match model.provider() {
        ProviderKind::OpenAi => {
            let mut provider = if api_key.is_empty() {
                OpenAiVisionProvider::anonymous()
            } else {
                OpenAiVisionProvider::new(api_key)
            };
            provider = provider
                .with_model(model.model())
                .with_max_tokens(model.max_tokens());
            if let Some(url) = &model.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
        ProviderKind::Gemini => {
            let mut provider = GeminiVisionProvider::new(api_key)
                .with_model(model.model())
                .with_max_tokens(model.max_tokens());
            if let Some(url) = &model.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
    }
}

pub fn build_sampler(config: &VidwatchConfig) -> FrameSampler {
    let sampling = &config.sampling;
    let decoder = FfmpegDecoder::new().with_binaries(sampling.ffmpeg_path(), sampling.ffprobe_path());
    FrameSampler::new(Arc::new(decoder)).with_options(SamplerOptions {
        max_width: sampling.max_width(),
        jpeg_quality: sampling.jpeg_quality(),
        temp_dir: sampling.temp_dir.clone(),
        ..Default::default()
    })
}

pub fn build_tool(config: &VidwatchConfig) -> VideoAnalysisTool {
    let storage = LocalFolderStorage::new(config.storage.input_folder());
    let provider = build_provider(config);
    info!(
        provider = provider.name(),
        model = config.model.model(),
        folder = %storage.root().display(),
        "Built watch_video tool"
    );

    VideoAnalysisTool::new(Arc::new(storage), provider, Arc::new(build_sampler(config)))
        .with_max_frames(config.sampling.max_frames())
}
