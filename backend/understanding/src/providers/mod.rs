pub mod gemini;
pub mod mock;
pub mod openai;

/// Default cap on response tokens for vision answers.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
