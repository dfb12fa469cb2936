use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use vidwatch_core::{ContentPart, LlmProvider, LlmResponse, MessageRole, MultimodalRequest};

use super::DEFAULT_MAX_TOKENS;

/// Vision provider speaking the OpenAI chat-completions protocol.
///
/// Works against any compatible endpoint (OpenRouter, Ollama, vLLM) via
/// [`with_base_url`](Self::with_base_url). Images travel as `data:` URLs.
pub struct OpenAiVisionProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiVisionProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// A provider for endpoints that take no credentials, such as local Ollama.
    pub fn anonymous() -> Self {
        Self {
            api_key: None,
            ..Self::new("")
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

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: ChatContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ChatPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn to_chat_messages(request: &MultimodalRequest) -> Vec<ChatMessage> {
    request
        .messages
        .iter()
        .map(|message| {
            let content = match message.role {
                MessageRole::System => ChatContent::Text(message.text()),
                MessageRole::User => ChatContent::Parts(
                    message
                        .parts
                        .iter()
                        .map(|part| match part {
                            ContentPart::Text { text } => ChatPart::Text { text: text.clone() },
                            ContentPart::InlineImage { mime_type, data } => ChatPart::ImageUrl {
                                image_url: ImageUrl {
                                    url: format!("data:{};base64,{}", mime_type, data),
                                },
                            },
                        })
                        .collect(),
                ),
            };
            ChatMessage {
                role: message.role.as_str(),
                content,
            }
        })
        .collect()
}

/// Content of the first choice. A response without one carries no answer.
fn answer_text(choices: Vec<Choice>) -> Result<String> {
    let Some(choice) = choices.into_iter().next() else {
        anyhow::bail!("OpenAI vision returned no choices");
    };
    match choice.message.content {
        Some(text) if !text.is_empty() => Ok(text),
        _ => anyhow::bail!("OpenAI vision returned a choice without content"),
    }
}

#[async_trait]
impl LlmProvider for OpenAiVisionProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &MultimodalRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        info!("[Vision] Analyzing {} frame(s) via {}", request.image_count(), self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: to_chat_messages(request),
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, base_url = %self.base_url, "Sending vision request");

        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http.send().await.context("Vision HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI vision returned {}: {}", status, error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse vision response")?;

        let tokens_used = chat_response
            .usage
            .as_ref()
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);
        let content = answer_text(chat_response.choices)?;

        Ok(LlmResponse {
            content,
            provider: "openai".to_string(),
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidwatch_core::MultimodalMessage;

    fn request() -> MultimodalRequest {
        MultimodalRequest::new()
            .with_message(MultimodalMessage::new(MessageRole::System).with_text("persona"))
            .with_message(
                MultimodalMessage::new(MessageRole::User)
                    .with_text("question")
                    .with_inline_image("image/jpeg", "AAAA")
                    .with_inline_image("image/jpeg", "BBBB"),
            )
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(to_chat_messages(&request())).unwrap();

        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"], "persona");

        let parts = &json[1]["content"];
        assert_eq!(json[1]["role"], "user");
        assert_eq!(parts[0], serde_json::json!({ "type": "text", "text": "question" }));
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
        assert_eq!(parts[2]["image_url"]["url"], "data:image/jpeg;base64,BBBB");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAiVisionProvider::anonymous().with_base_url("http://localhost:11434/v1/");
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_answer_from_first_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{ "choices": [{ "message": { "content": "Two cats." } }], "usage": { "total_tokens": 9 } }"#,
        )
        .unwrap();
        assert_eq!(answer_text(parsed.choices).unwrap(), "Two cats.");
    }

    #[test]
    fn test_empty_choices_is_error() {
        let parsed: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();
        let err = answer_text(parsed.choices).unwrap_err();
        assert!(err.to_string().contains("no choices"));

        let parsed: ChatResponse =
            serde_json::from_str(r#"{ "choices": [{ "message": { "content": null } }] }"#).unwrap();
        assert!(answer_text(parsed.choices).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_error() {
        let provider = OpenAiVisionProvider::new("sk-test").with_base_url("http://127.0.0.1:1");
        assert!(provider.complete(&request()).await.is_err());
    }
}
