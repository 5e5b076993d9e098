use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons why the model stopped generating a response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model reached the end of a generated turn
    EndTurn,

    /// The response reached the maximum token limit for the response
    MaxTokens,

    /// The model reached a specified stop sequence
    StopSequence,

    /// The model indicated it wants to use a tool
    ToolUse,

    /// The model refused to respond due to safety or other considerations
    Refusal,

    /// A stop reason this crate does not model.
    #[serde(other)]
    Other,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::ToolUse => write!(f, "tool_use"),
            StopReason::Refusal => write!(f, "refusal"),
            StopReason::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reasons_round_trip_through_display() {
        let reason: StopReason = serde_json::from_str(r#""max_tokens""#).unwrap();
        assert_eq!(reason, StopReason::MaxTokens);
        assert_eq!(reason.to_string(), "max_tokens");
    }

    #[test]
    fn unknown_reasons_collapse_to_other() {
        let reason: StopReason = serde_json::from_str(r#""pause_turn""#).unwrap();
        assert_eq!(reason, StopReason::Other);
    }
}
