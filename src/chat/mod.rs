//! Chat application module for interactive conversations with Claude.
//!
//! This module provides a REPL chat interface built on top of the
//! generation client.  It supports:
//!
//! - Slash commands for session control (`/help`, `/clear`, `/model`, `/exit`)
//! - A processing indicator while a response is outstanding
//! - Input that stays live while the model is answering
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: The session controller and its state
//! - [`commands`]: Slash command parsing and the canned responses
//! - [`render`]: Terminal output
//! - [`event_loop`]: Multiplexes input and generation results

mod commands;
mod config;
mod event_loop;
mod render;
mod session;

pub use commands::{
    ChatCommand, SUGGESTED_MODELS, help_text, model_overview, model_switched, parse_command,
    unknown_command,
};
pub use config::{ChatArgs, ChatConfig, read_env_file};
pub use event_loop::{InputEvent, SessionEnd, run};
pub use render::{PlainTextRenderer, Renderer, TranscriptView};
pub use session::{
    Dispatch, GenerationOutcome, GenerationRequest, Message, NOT_INITIALIZED_MESSAGE, RequestId,
    Role, SessionController, SessionState,
};
