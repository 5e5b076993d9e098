//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::path::{Path, PathBuf};

use arrrg_derive::CommandLine;

use crate::client::API_KEY_ENV_VAR;
use crate::error::{Error, Result};
use crate::generation::GenerationConfig;
use crate::types::Model;

/// Env file consulted for the API key when none is configured otherwise.
const DEFAULT_ENV_FILE: &str = ".env";

/// Command-line arguments for the agent-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: claude-3-5-sonnet-20241022)", "MODEL")]
    pub model: Option<String>,

    /// API key; overrides the environment.
    #[arrrg(optional, "Anthropic API key (default: $ANTHROPIC_API_KEY)", "KEY")]
    pub api_key: Option<String>,

    /// Env file searched for ANTHROPIC_API_KEY.
    #[arrrg(optional, "Env file to read ANTHROPIC_API_KEY from (default: .env)", "PATH")]
    pub env_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Enable debug logging.
    #[arrrg(flag, "Log debug output to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// API key given explicitly on the command line.
    pub api_key: Option<String>,

    /// Env file consulted when neither the flag nor the environment has a key.
    pub env_file: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log at debug level.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: claude-3-5-sonnet-20241022
    /// - Env file: .env
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            api_key: None,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the env file.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Resolves the API key: explicit flag, then the environment, then the env file.
    ///
    /// Empty values count as absent.  The process environment is not modified.
    ///
    /// # Errors
    ///
    /// Returns an error only when the env file exists but cannot be read.
    pub fn resolve_api_key(&self) -> Result<Option<String>> {
        let explicit = non_empty(self.api_key.clone());
        if explicit.is_some() {
            return Ok(explicit);
        }
        let from_env = non_empty(env::var(API_KEY_ENV_VAR).ok());
        if from_env.is_some() {
            return Ok(from_env);
        }
        Ok(non_empty(read_env_file(&self.env_file, API_KEY_ENV_VAR)?))
    }

    /// Builds the generation client configuration.
    ///
    /// An unreadable env file is logged and treated as missing, so the
    /// resulting failure surfaces as the usual missing-key error.
    pub fn generation_config(&self) -> GenerationConfig {
        let api_key = self.resolve_api_key().unwrap_or_else(|err| {
            tracing::warn!(error = %err, path = %self.env_file.display(), "could not read env file");
            None
        });
        GenerationConfig {
            model: Some(self.model.clone()),
            api_key,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model.map(Model::from).unwrap_or_default(),
            api_key: args.api_key,
            env_file: args
                .env_file
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE)),
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

/// Looks up `key` in a dotenv-style file without touching the process
/// environment.  The last assignment wins.  A missing file yields `None`.
pub fn read_env_file(path: &Path, key: &str) -> Result<Option<String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => return Ok(None),
        Err(err) => return Err(env_file_error(path, err)),
    };
    let mut found = None;
    for entry in entries {
        let (name, value) = entry.map_err(|err| env_file_error(path, err))?;
        if name == key {
            found = Some(value);
        }
    }
    Ok(found)
}

fn env_file_error(path: &Path, err: dotenvy::Error) -> Error {
    match err {
        dotenvy::Error::Io(err) => Error::io(format!("failed to read {}", path.display()), err),
        err => Error::configuration(format!("invalid env file {}: {err}", path.display())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Claude35Sonnet20241022));
        assert!(config.api_key.is_none());
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config.model, Model::default());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("claude-3-opus-20240229".to_string()),
            api_key: Some("sk-flag".to_string()),
            env_file: Some("secrets.env".to_string()),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Claude3Opus20240229));
        assert_eq!(config.api_key.as_deref(), Some("sk-flag"));
        assert_eq!(config.env_file, PathBuf::from("secrets.env"));
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn custom_model_names_are_kept() {
        let args = ChatArgs {
            model: Some("claude-next".to_string()),
            ..ChatArgs::default()
        };
        assert_eq!(
            ChatConfig::from(args).model,
            Model::Custom("claude-next".to_string())
        );
    }

    #[test]
    fn explicit_key_wins() {
        let config = ChatConfig::new().with_api_key("sk-explicit");
        assert_eq!(
            config.resolve_api_key().unwrap().as_deref(),
            Some("sk-explicit")
        );
        assert_eq!(
            config.generation_config().api_key.as_deref(),
            Some("sk-explicit")
        );
    }

    #[test]
    fn read_env_file_missing_is_none() {
        let path = env::temp_dir().join("agent-chat-definitely-missing.env");
        assert_eq!(read_env_file(&path, API_KEY_ENV_VAR).unwrap(), None);
    }

    fn env_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("agent-chat-{}-{name}.env", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn read_env_file_finds_key() {
        let path = env_file("plain", "ANTHROPIC_API_KEY=sk-from-file\n");
        let value = read_env_file(&path, API_KEY_ENV_VAR).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(value.as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn read_env_file_handles_quotes_exports_and_comments() {
        let path = env_file(
            "variants",
            "# comment\nOTHER=1\nANTHROPIC_API_KEY=\"sk-quoted\"\nexport ANTHROPIC_API_KEY='sk-exported'\nNOTE=plain # trailing\n",
        );
        let key = read_env_file(&path, API_KEY_ENV_VAR).unwrap();
        let other = read_env_file(&path, "OTHER").unwrap();
        let note = read_env_file(&path, "NOTE").unwrap();
        let missing = read_env_file(&path, "MISSING").unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(key.as_deref(), Some("sk-exported"));
        assert_eq!(other.as_deref(), Some("1"));
        assert_eq!(note.as_deref(), Some("plain"));
        assert_eq!(missing, None);
    }

    #[test]
    fn env_file_key_is_used_when_nothing_else_is_set() {
        if env::var(API_KEY_ENV_VAR).is_ok() {
            eprintln!("Skipping test: ANTHROPIC_API_KEY is set");
            return;
        }
        let path = env_file("fallback", "ANTHROPIC_API_KEY=sk-from-file\n");
        let config = ChatConfig::new().with_env_file(&path);
        let key = config.resolve_api_key().unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(key.as_deref(), Some("sk-from-file"));
    }
}
