use serde::{Deserialize, Serialize};

use crate::types::{ContentBlock, Model, StopReason, Usage};

/// A response message returned by the Messages API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique object identifier.
    pub id: String,

    /// Content generated by the model.
    pub content: Vec<ContentBlock>,

    /// The model that handled the request.
    pub model: Model,

    /// The reason that we stopped.
    #[serde(default)]
    pub stop_reason: Option<StopReason>,

    /// Billing and rate-limit usage.
    #[serde(default)]
    pub usage: Usage,
}

impl Message {
    /// Concatenates every text block of the response.
    ///
    /// Returns `None` when the response carries no text at all.
    pub fn text(&self) -> Option<String> {
        let mut blocks = self.content.iter().filter_map(ContentBlock::as_text).peekable();
        blocks.peek()?;
        Some(blocks.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "id": "msg_013Zva2CMHLNnXjNJJKqJ2EF",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20241022",
        "content": [
            {"type": "text", "text": "Hi! "},
            {"type": "text", "text": "My name is Claude."}
        ],
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 2095, "output_tokens": 503}
    }"#;

    #[test]
    fn deserialize_response() {
        let message: Message = serde_json::from_str(RESPONSE).unwrap();
        assert_eq!(message.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(message.usage, Usage::new(2095, 503));
        assert_eq!(message.text().as_deref(), Some("Hi! My name is Claude."));
    }

    #[test]
    fn text_is_none_without_text_blocks() {
        let message: Message = serde_json::from_str(
            r#"{"id": "msg_1", "model": "x", "content": [{"type": "redacted_thinking", "data": "..."}]}"#,
        )
        .unwrap();
        assert_eq!(message.text(), None);
    }
}
