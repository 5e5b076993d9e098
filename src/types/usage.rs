use serde::{Deserialize, Serialize};

/// Usage information for API calls.
///
/// Anthropic's API bills and rate-limits by token counts, as tokens represent the
/// underlying cost to their systems.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Usage {
    /// The number of input tokens which were used.
    pub input_tokens: i32,

    /// The number of output tokens which were used.
    pub output_tokens: i32,
}

impl Usage {
    /// Create a new `Usage` with the given input and output tokens.
    pub fn new(input_tokens: i32, output_tokens: i32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}
