use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::message::MultimodalRequest;
use crate::types::ToolResult;

/// A capability that an agent can invoke dynamically.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g., "watch_video").
    fn name(&self) -> &str;

    /// Description for the LLM prompt.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters(&self) -> Value;

    /// Run the tool. Failures are reported in the result, never raised.
    async fn invoke(&self, args: Value) -> ToolResult;

    /// Descriptor handed to the orchestrating agent.
    fn descriptor(&self) -> Value {
        serde_json::json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.parameters(),
        })
    }
}

/// Vision-capable completion engine.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Send a multimodal request and return the response text.
    async fn complete(&self, request: &MultimodalRequest) -> Result<LlmResponse>;
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Read-only view of the place videos are stored.
#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// Every available file path, as the storage reports it.
    async fn list_paths(&self) -> Result<Vec<String>>;

    /// Full contents of one file.
    async fn download(&self, path: &str) -> Result<Bytes>;
}
