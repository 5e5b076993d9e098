//! agent-chat: an interactive terminal chat session backed by the Anthropic API.
//!
//! The interesting part is [`chat::SessionController`], which owns the
//! conversation and routes every line either to a local slash command or to
//! the [`GenerationClient`].

// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod generation;
pub mod observability;
pub mod types;

// Re-exports
pub use client::Anthropic;
pub use error::{Error, Result};
pub use generation::{
    Backend, GENERATION_APOLOGY, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE, GenerationClient,
    GenerationConfig,
};
pub use observability::register_biometrics;
pub use types::*;
