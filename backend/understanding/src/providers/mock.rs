use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use vidwatch_core::{LlmProvider, LlmResponse, MultimodalRequest};

/// A mock vision provider that returns canned responses and remembers the
/// last request it saw.
pub struct MockVisionProvider {
    name: String,
    fixed_response: Option<String>,
    failure: Option<String>,
    last_request: Mutex<Option<MultimodalRequest>>,
}

impl MockVisionProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
            last_request: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Make every call fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn last_request(&self) -> Option<MultimodalRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl LlmProvider for MockVisionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &MultimodalRequest) -> Result<LlmResponse> {
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(LlmResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: "mock".to_string(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
