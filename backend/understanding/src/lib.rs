//! Vision understanding: prompt assembly for sampled video frames and the
//! completion engines that answer it.

pub mod providers;
pub mod request;

pub use providers::gemini::GeminiVisionProvider;
pub use providers::mock::MockVisionProvider;
pub use providers::openai::OpenAiVisionProvider;
pub use request::{build_video_request, ANALYST_PERSONA, QUESTION_PREFIX};
