use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use vidwatch_core::{ContentPart, LlmProvider, LlmResponse, MultimodalRequest};

use super::DEFAULT_MAX_TOKENS;

/// Google Gemini `generateContent` vision provider.
pub struct GeminiVisionProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl GeminiVisionProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Inline { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

fn to_generate_request(request: &MultimodalRequest, max_tokens: u32) -> GenerateRequest {
    let system_instruction = request.system_prompt().map(|text| Content {
        role: None,
        parts: vec![Part::Text { text }],
    });

    // System text travels in `systemInstruction`; every remaining turn is the user's.
    let contents = request
        .conversation()
        .map(|message| Content {
            role: Some("user"),
            parts: message
                .parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => Part::Text { text: text.clone() },
                    ContentPart::InlineImage { mime_type, data } => Part::Inline {
                        inline_data: InlineData {
                            mime_type: mime_type.clone(),
                            data: data.clone(),
                        },
                    },
                })
                .collect(),
        })
        .collect();

    GenerateRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            max_output_tokens: max_tokens,
        },
    }
}

/// Text of the first candidate. A response without one carries no answer.
fn answer_text(candidates: Vec<Candidate>) -> Result<String> {
    let Some(candidate) = candidates.into_iter().next() else {
        anyhow::bail!("Gemini vision returned no candidates");
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        anyhow::bail!("Gemini vision returned a candidate without text");
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for GeminiVisionProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &MultimodalRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        info!("[Vision] Analyzing {} frame(s) via Gemini {}", request.image_count(), self.model);

        let body = to_generate_request(request, self.max_tokens);
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini vision returned {}: {}", status, error_body);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let tokens_used = parsed
            .usage_metadata
            .as_ref()
            .and_then(|u| u.total_token_count)
            .unwrap_or(0);
        let content = answer_text(parsed.candidates)?;

        Ok(LlmResponse {
            content,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
