use vidwatch_core::{MessageRole, MultimodalMessage, MultimodalRequest, SampleFrame};

pub const ANALYST_PERSONA: &str = "You are an expert video analyst.";

pub const QUESTION_PREFIX: &str = "Analyze these frames to answer this question: ";

/// Assemble the prompt for a question about a sampled video.
///
/// The user message carries the question first, then one inline image per
/// frame in capture order. An empty frame set still produces a valid,
/// question-only request.
pub fn build_video_request(question: &str, frames: &[SampleFrame]) -> MultimodalRequest {
    let user = frames.iter().fold(
        MultimodalMessage::new(MessageRole::User).with_text(format!("{QUESTION_PREFIX}{question}")),
        |message, frame| message.with_inline_image(frame.mime_type.clone(), frame.data.clone()),
    );

    MultimodalRequest::new()
        .with_message(MultimodalMessage::new(MessageRole::System).with_text(ANALYST_PERSONA))
        .with_message(user)
}
