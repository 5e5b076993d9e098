use serde::{Deserialize, Serialize};

use crate::types::{MessageParam, Model};

/// Parameters for a non-streaming `POST /v1/messages` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageCreateParams {
    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,

    /// Input messages.
    pub messages: Vec<MessageParam>,

    /// The model that will complete your prompt.
    pub model: Model,

    /// Amount of randomness injected into the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessageCreateParams {
    /// Create new parameters with the required fields.
    pub fn new(max_tokens: u32, messages: Vec<MessageParam>, model: Model) -> Self {
        Self {
            max_tokens,
            messages,
            model,
            temperature: None,
        }
    }

    /// Create parameters for a single user prompt.
    pub fn simple(prompt: impl Into<String>, model: impl Into<Model>, max_tokens: u32) -> Self {
        Self::new(max_tokens, vec![MessageParam::user(prompt)], model.into())
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}
