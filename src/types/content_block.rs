use serde::{Deserialize, Serialize};

/// A block of content in a response message.
///
/// Only text is rendered by the chat session; other block kinds the API may
/// add are tolerated and skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A block of text content
    #[serde(rename = "text")]
    Text(TextBlock),

    /// Any block type this crate does not model.
    #[serde(other)]
    Unsupported,
}

/// A text block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    /// The text content.
    pub text: String,
}

impl ContentBlock {
    /// Returns the text of a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(block) => Some(&block.text),
            ContentBlock::Unsupported => None,
        }
    }
}
