pub mod error;
pub mod message;
pub mod tools;
pub mod traits;
pub mod types;

pub use error::VideoToolError;
pub use message::{ContentPart, MessageRole, MultimodalMessage, MultimodalRequest};
pub use tools::ToolRegistry;
pub use traits::{LlmProvider, LlmResponse, Tool, VideoStorage};
pub use types::{FrameSet, SampleFrame, ToolOutput, ToolResult};
