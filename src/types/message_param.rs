use serde::{Deserialize, Serialize};

/// Parameters for a message sent to the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageParam {
    /// The content of the message.
    pub content: String,

    /// The role of the message.
    pub role: MessageRole,
}

/// Role type for a message parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl MessageParam {
    /// Create a new `MessageParam` with the given content and role.
    pub fn new(content: impl Into<String>, role: MessageRole) -> Self {
        Self {
            content: content.into(),
            role,
        }
    }

    /// Create a new user `MessageParam`.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::User)
    }

    /// Create a new assistant `MessageParam`.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::Assistant)
    }
}

impl From<&str> for MessageParam {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}
