use serde::{Deserialize, Serialize};

/// Who a message in a multimodal request is attributed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single segment of a message: text, or an image embedded inline as base64.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    InlineImage { mime_type: String, data: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline_image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineImage {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::InlineImage { .. })
    }
}

/// One role-tagged message made of ordered parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultimodalMessage {
    pub role: MessageRole,
    pub parts: Vec<ContentPart>,
}

impl MultimodalMessage {
    pub fn new(role: MessageRole) -> Self {
        Self {
            role,
            parts: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::text(text));
        self
    }

    pub fn with_inline_image(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.parts.push(ContentPart::inline_image(mime_type, data));
        self
    }

    /// Concatenated text parts, images skipped.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::InlineImage { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered multipart request handed to a vision-capable completion engine.
///
/// Part order is meaningful: image parts are presented to the model in the
/// order they were captured.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultimodalRequest {
    pub messages: Vec<MultimodalMessage>,
}

impl MultimodalRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: MultimodalMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Text of the first system message, if any.
    pub fn system_prompt(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(MultimodalMessage::text)
    }

    /// Messages other than the system instruction, in order.
    pub fn conversation(&self) -> impl Iterator<Item = &MultimodalMessage> {
        self.messages.iter().filter(|m| m.role != MessageRole::System)
    }

    pub fn image_count(&self) -> usize {
        self.messages
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter(|p| p.is_image())
            .count()
    }
}
