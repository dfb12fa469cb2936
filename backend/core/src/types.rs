use serde::{Deserialize, Serialize};

/// One sampled still image, JPEG-compressed and base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleFrame {
    /// Sequential position of the frame in the decoded stream.
    pub source_index: u64,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    /// Base64 (standard alphabet) of the encoded image.
    pub data: String,
}

/// Frames in capture order.
pub type FrameSet = Vec<SampleFrame>;

/// Outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    Success(String),
    Failure(String),
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn into_output(self) -> ToolOutput {
        self.into()
    }
}

/// Wire shape returned to the orchestrating agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    pub output: String,
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
}

impl From<ToolResult> for ToolOutput {
    fn from(result: ToolResult) -> Self {
        let output = match result {
            ToolResult::Success(text) | ToolResult::Failure(text) => text,
        };
        Self {
            output,
            sources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_shape() {
        let output = ToolResult::Failure("nope".into()).into_output();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({ "output": "nope", "sources": [] }));
    }

    #[test]
    fn test_tool_result_accessors() {
        let ok = ToolResult::Success("done".into());
        assert!(ok.is_success());
        assert_eq!(ok.text(), "done");
        assert!(!ToolResult::Failure("x".into()).is_success());
    }
}
