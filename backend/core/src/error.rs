use thiserror::Error;

/// Failure taxonomy for a single video analysis request.
///
/// Every variant is caught at the orchestration boundary and rendered as
/// plain text for the calling agent; none of them escape as a raw fault.
#[derive(Debug, Error)]
pub enum VideoToolError {
    #[error("Error: Video '{name}' was not found. Available videos are: [{}]. Please retry with a valid name.", .available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    #[error("Technical Error processing video file: {0}")]
    Extraction(String),

    #[error("Error calling Vision LLM: {0}")]
    Inference(String),
}

impl VideoToolError {
    /// Whether the caller can recover by retrying with different arguments.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_candidate() {
        let err = VideoToolError::NotFound {
            name: "bird.mp4".into(),
            available: vec!["cat.mp4".into(), "dog.mp4".into()],
        };
        let text = err.to_string();
        assert!(text.contains("'bird.mp4'"));
        assert!(text.contains("[cat.mp4, dog.mp4]"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn failure_messages_are_distinguishable() {
        let extraction = VideoToolError::Extraction("boom".into()).to_string();
        let inference = VideoToolError::Inference("boom".into()).to_string();
        assert_ne!(extraction, inference);
        assert!(extraction.starts_with("Technical Error"));
        assert!(inference.starts_with("Error calling Vision LLM"));
    }
}
