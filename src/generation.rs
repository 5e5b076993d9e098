//! The generation client: one prompt in, one response string out.
//!
//! [`GenerationClient::generate`] never fails.  Whatever goes wrong in the
//! backend is logged and replaced by [`GENERATION_APOLOGY`], so the chat
//! session only ever sees text.

use std::sync::Arc;

use crate::client::Anthropic;
use crate::error::{Error, Result};
use crate::observability::{GENERATION_FAILURES, GENERATIONS};
use crate::types::{MessageCreateParams, Model};

/// Sampling temperature used for every generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Maximum output tokens requested for every generation.
pub const GENERATION_MAX_TOKENS: u32 = 2000;

/// The text substituted for a failed generation.
pub const GENERATION_APOLOGY: &str =
    "Sorry, I encountered an error while processing your request.";

/// A text-generation capability.
///
/// Implementations perform exactly one call and report failures as errors;
/// the [`GenerationClient`] decides what the user sees.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Generate a response to `prompt` with the given model and sampling settings.
    async fn generate(
        &self,
        prompt: &str,
        model: &Model,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;
}

#[async_trait::async_trait]
impl Backend for Anthropic {
    async fn generate(
        &self,
        prompt: &str,
        model: &Model,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let params = MessageCreateParams::simple(prompt, model.clone(), max_tokens)
            .with_temperature(temperature);
        let message = self.send(params).await?;
        message
            .text()
            .ok_or_else(|| Error::malformed_response("response contained no text blocks"))
    }
}

/// Configuration for constructing a [`GenerationClient`].
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    /// Model to use; defaults to [`Model::default`].
    pub model: Option<Model>,
    /// API key; when absent it is read from the environment.
    pub api_key: Option<String>,
}

impl GenerationConfig {
    /// Sets the model.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Wraps a [`Backend`] together with the model identifier it is called with.
///
/// Cloning is cheap; the backend is shared.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn Backend>,
    model: Model,
}

impl GenerationClient {
    /// Creates a client talking to the Anthropic API.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key is available.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Anthropic::new(config.api_key)?;
        Ok(Self::with_backend(
            Arc::new(client),
            config.model.unwrap_or_default(),
        ))
    }

    /// Creates a client over an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn Backend>, model: Model) -> Self {
        Self { backend, model }
    }

    /// Generates a response, substituting [`GENERATION_APOLOGY`] on failure.
    pub async fn generate(&self, prompt: &str) -> String {
        GENERATIONS.click();
        match self
            .backend
            .generate(
                prompt,
                &self.model,
                GENERATION_TEMPERATURE,
                GENERATION_MAX_TOKENS,
            )
            .await
        {
            Ok(text) => text,
            Err(err) => {
                GENERATION_FAILURES.click();
                tracing::error!(
                    error = %err,
                    model = %self.model,
                    status = ?err.status_code(),
                    request_id = ?err.request_id(),
                    "AI generation error"
                );
                GENERATION_APOLOGY.to_string()
            }
        }
    }

    /// Replaces the model used for subsequent generations.  No validation is done.
    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.model
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
