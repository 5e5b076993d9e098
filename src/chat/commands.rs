//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.  Matching is exact and case-sensitive.

use crate::types::{KnownModel, Model};

/// Models offered by `/model` when called without an argument.
pub const SUGGESTED_MODELS: [KnownModel; 3] = [
    KnownModel::Claude35Sonnet20241022,
    KnownModel::Claude35Haiku20241022,
    KnownModel::Claude3Opus20240229,
];

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exit the chat application.
    Exit,

    /// Clear the conversation history.
    Clear,

    /// Display help information.
    Help,

    /// Report the current model and the suggested alternatives.
    ShowModel,

    /// Change the model.
    SwitchModel(String),

    /// Any other line starting with `/`; carries the trimmed line.
    Unknown(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use agent_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
/// assert_eq!(
///     parse_command("/model claude-3-5-haiku-20241022"),
///     Some(ChatCommand::SwitchModel("claude-3-5-haiku-20241022".to_string()))
/// );
/// assert!(parse_command("Hello, Claude!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let command = match input {
        "/exit" => ChatCommand::Exit,
        "/clear" => ChatCommand::Clear,
        "/help" => ChatCommand::Help,
        _ if input.starts_with("/model") => {
            let argument = input.split_whitespace().skip(1).collect::<Vec<_>>();
            if argument.is_empty() {
                ChatCommand::ShowModel
            } else {
                ChatCommand::SwitchModel(argument.join(" "))
            }
        }
        _ => ChatCommand::Unknown(input.to_string()),
    };

    Some(command)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
/help - Show this help message
/clear - Clear the conversation
/exit - Exit the application
/model <name> - Switch AI model

Or just type normally to chat!"#
}

/// Describes the current model and the suggested alternatives.
pub fn model_overview(current: &Model) -> String {
    let mut overview = format!("Current model: {current}\n\nAvailable models:\n");
    for model in SUGGESTED_MODELS {
        overview.push_str("- ");
        overview.push_str(model.as_str());
        overview.push('\n');
    }
    overview.push_str("\nUse /model <name> to switch");
    overview
}

/// Confirms a model switch.
pub fn model_switched(model: &Model) -> String {
    format!("Switched to model: {model}")
}

/// Answers a line that looked like a command but was not one.
pub fn unknown_command(line: &str) -> String {
    format!("Unknown command: {line}. Type /help for available commands.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exact_commands() {
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("  /exit  "), Some(ChatCommand::Exit));
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert_eq!(
            parse_command("/CLEAR"),
            Some(ChatCommand::Unknown("/CLEAR".to_string()))
        );
    }

    #[test]
    fn trailing_words_make_a_command_unknown() {
        assert_eq!(
            parse_command("/exit now"),
            Some(ChatCommand::Unknown("/exit now".to_string()))
        );
    }

    #[test]
    fn parse_model() {
        assert_eq!(parse_command("/model"), Some(ChatCommand::ShowModel));
        assert_eq!(parse_command("/model    "), Some(ChatCommand::ShowModel));
        assert_eq!(
            parse_command("/model claude-3-opus-20240229"),
            Some(ChatCommand::SwitchModel("claude-3-opus-20240229".to_string()))
        );
    }

    #[test]
    fn model_argument_is_rejoined_with_single_spaces() {
        assert_eq!(
            parse_command("/model  my   custom\tmodel "),
            Some(ChatCommand::SwitchModel("my custom model".to_string()))
        );
    }

    #[test]
    fn unknown_keeps_trimmed_line() {
        assert_eq!(
            parse_command("   /frobnicate it  "),
            Some(ChatCommand::Unknown("/frobnicate it".to_string()))
        );
        assert_eq!(parse_command("/"), Some(ChatCommand::Unknown("/".to_string())));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Claude!"), None);
        assert_eq!(parse_command("what does /help do?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_every_command() {
        let help = help_text();
        for command in ["/help", "/clear", "/exit", "/model"] {
            assert!(help.contains(command), "help text is missing {command}");
        }
    }

    #[test]
    fn model_overview_lists_suggestions() {
        let overview = model_overview(&Model::default());
        assert!(overview.starts_with("Current model: claude-3-5-sonnet-20241022"));
        assert!(overview.contains("- claude-3-5-haiku-20241022"));
        assert!(overview.contains("- claude-3-opus-20240229"));
    }

    #[test]
    fn unknown_command_message() {
        assert_eq!(
            unknown_command("/nope"),
            "Unknown command: /nope. Type /help for available commands."
        );
    }
}
