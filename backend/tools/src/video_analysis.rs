//! `watch_video`: answer a question about a stored video.
//!
//! Request flow: the name is validated against the storage listing, the file
//! is sampled into a handful of frames, and the frames plus question go to a
//! vision model. Every failure ends the request with a plain-text message the
//! calling agent can read and act on; nothing is retried here.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use vidwatch_core::{FrameSet, LlmProvider, Tool, ToolResult, VideoStorage, VideoToolError};
use vidwatch_logging::redact_sensitive_data;
use vidwatch_media::{temp_suffix_for, FrameSampler, DEFAULT_MAX_FRAMES};
use vidwatch_understanding::build_video_request;

pub const TOOL_NAME: &str = "watch_video";

pub const DEFAULT_QUESTION: &str = "Describe this video.";

/// Arguments of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoQuery {
    pub video_name: String,
    pub question: String,
}

impl VideoQuery {
    pub fn new(video_name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            video_name: video_name.into(),
            question: question.into(),
        }
    }

    /// Lenient parse of tool arguments. Accepts the fields at the top level or
    /// wrapped in an `input` object; a missing name becomes empty and a missing
    /// question falls back to [`DEFAULT_QUESTION`].
    pub fn from_args(args: &Value) -> Self {
        let args = match args.get("input") {
            Some(inner) if inner.is_object() => inner,
            _ => args,
        };
        let video_name = args["video_name"].as_str().unwrap_or("").trim().to_string();
        let question = args["question"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUESTION)
            .to_string();
        Self { video_name, question }
    }
}

/// Strip surrounding whitespace and leading path separators.
pub fn normalize_video_name(name: &str) -> &str {
    name.trim().trim_start_matches(['/', '\\'])
}

/// Collaborators for a single analysis, passed in explicitly.
pub struct AnalysisContext<'a> {
    pub storage: &'a dyn VideoStorage,
    pub provider: &'a dyn LlmProvider,
    pub sampler: Arc<FrameSampler>,
    pub max_frames: usize,
}

/// Answer `query`, mapping every failure to [`ToolResult::Failure`].
pub async fn analyze_video(ctx: &AnalysisContext<'_>, query: &VideoQuery) -> ToolResult {
    match run_analysis(ctx, query).await {
        Ok(answer) => ToolResult::Success(answer),
        Err(err) => {
            warn!(video = %query.video_name, recoverable = err.is_recoverable(), "watch_video failed: {}", err);
            ToolResult::Failure(redact_sensitive_data(&err.to_string()))
        }
    }
}

async fn run_analysis(ctx: &AnalysisContext<'_>, query: &VideoQuery) -> Result<String, VideoToolError> {
    let (matched, storage_path) = resolve_video(ctx.storage, &query.video_name).await?;
    info!(video = %matched, "Video validated");

    let frames = sample_video(ctx, &matched, &storage_path).await?;
    info!(video = %matched, frames = frames.len(), "Video sampled");

    let request = build_video_request(&query.question, &frames);
    let response = ctx
        .provider
        .complete(&request)
        .await
        .map_err(|e| VideoToolError::Inference(format!("{e:#}")))?;
    info!(
        video = %matched,
        provider = %response.provider,
        model = %response.model,
        tokens = response.tokens_used,
        latency_ms = response.latency_ms,
        "Video answered"
    );

    Ok(format!("Visual Analysis of '{}': {}", matched, response.content))
}

/// Find the listing entry matching `requested` exactly, after normalization.
/// Returns the normalized name and the path as the storage reported it.
async fn resolve_video(
    storage: &dyn VideoStorage,
    requested: &str,
) -> Result<(String, String), VideoToolError> {
    let listing = storage
        .list_paths()
        .await
        .map_err(|e| VideoToolError::Extraction(format!("{e:#}")))?;
    let target = normalize_video_name(requested);

    if let Some(path) = listing.iter().find(|p| normalize_video_name(p) == target) {
        return Ok((target.to_string(), path.clone()));
    }

    Err(VideoToolError::NotFound {
        name: target.to_string(),
        available: listing
            .iter()
            .map(|p| normalize_video_name(p).to_string())
            .collect(),
    })
}

async fn sample_video(
    ctx: &AnalysisContext<'_>,
    name: &str,
    storage_path: &str,
) -> Result<FrameSet, VideoToolError> {
    let bytes = ctx
        .storage
        .download(storage_path)
        .await
        .map_err(|e| VideoToolError::Extraction(format!("{e:#}")))?;

    let sampler = Arc::clone(&ctx.sampler);
    let max_frames = ctx.max_frames;
    let suffix = temp_suffix_for(name);
    tokio::task::spawn_blocking(move || {
        sampler.sample_with_suffix(Cursor::new(bytes), max_frames, &suffix)
    })
    .await
    .map_err(|e| VideoToolError::Extraction(format!("sampling task failed: {e}")))?
    .map_err(|e| VideoToolError::Extraction(e.to_string()))
}

/// The `watch_video` tool bound to its collaborators.
pub struct VideoAnalysisTool {
    storage: Arc<dyn VideoStorage>,
    provider: Arc<dyn LlmProvider>,
    sampler: Arc<FrameSampler>,
    max_frames: usize,
}

impl VideoAnalysisTool {
    pub fn new(
        storage: Arc<dyn VideoStorage>,
        provider: Arc<dyn LlmProvider>,
        sampler: Arc<FrameSampler>,
    ) -> Self {
        Self {
            storage,
            provider,
            sampler,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub async fn analyze(&self, query: &VideoQuery) -> ToolResult {
        let ctx = AnalysisContext {
            storage: self.storage.as_ref(),
            provider: self.provider.as_ref(),
            sampler: Arc::clone(&self.sampler),
            max_frames: self.max_frames,
        };
        analyze_video(&ctx, query).await
    }

    pub async fn list_videos(&self) -> anyhow::Result<Vec<String>> {
        let paths = self.storage.list_paths().await?;
        Ok(paths
            .iter()
            .map(|p| normalize_video_name(p).to_string())
            .collect())
    }
}

#[async_trait]
impl Tool for VideoAnalysisTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Use this tool to analyze the visual content of a video file. You must provide the \
         filename and a specific question. If the filename is incorrect the tool will return \
         the list of available filenames."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "video_name": {
                    "type": "string",
                    "description": "The exact name of the video file (e.g., 'my_video.mp4')"
                },
                "question": {
                    "type": "string",
                    "description": "The specific question you want to answer about the video (e.g., 'How many people are in the video?')"
                }
            },
            "required": ["video_name", "question"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolResult {
        self.analyze(&VideoQuery::from_args(&args)).await
    }
}
