//! Core chat session management.
//!
//! This module provides the [`SessionController`], the single writer of the
//! conversation state.  Every submitted line goes through
//! [`SessionController::submit`]; every finished generation goes through
//! [`SessionController::settle`].  Nothing else mutates the log.
//!
//! At most one generation is in flight.  Chat lines submitted while one is
//! running are logged immediately and their prompts wait in a FIFO queue;
//! `settle` hands back the next request to run.

use std::collections::VecDeque;
use std::fmt;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::chat::commands::{self, ChatCommand};
use crate::error::Error;
use crate::generation::GenerationClient;
use crate::observability::{SESSION_CHAT_MESSAGES, SESSION_COMMANDS, SESSION_QUEUED_PROMPTS};
use crate::types::Model;

/// Shown for every chat line when the generation client could not be built.
pub const NOT_INITIALIZED_MESSAGE: &str =
    "AI service not initialized. Please check your ANTHROPIC_API_KEY.";

/// Who authored a message in the log.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user.
    User,
    /// Produced by the session or the model.
    Assistant,
}

/// One entry of the message log.  Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic, 1-based, unique within the session.
    pub id: u64,
    /// Who authored the message.
    pub role: Role,
    /// The text of the message.
    pub content: String,
}

/// Identifies one backend call so its completion can be matched to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// The state observed by the display layer.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    messages: Vec<Message>,
    pending_input: String,
    is_generating: bool,
    current_model: Model,
}

impl SessionState {
    /// The message log in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Text typed but not yet submitted.
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// True while a backend call is outstanding.
    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// The model chat lines are sent to.
    pub fn current_model(&self) -> &Model {
        &self.current_model
    }
}

/// A backend call handed out by the controller.
///
/// Run it anywhere and feed the outcome back through
/// [`SessionController::settle`].  The model is captured when the request is
/// issued.
pub struct GenerationRequest {
    id: RequestId,
    prompt: String,
    client: GenerationClient,
}

impl GenerationRequest {
    /// The id the outcome will carry.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The prompt sent to the backend.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The model the request will use.
    pub fn model(&self) -> &Model {
        self.client.model()
    }

    /// Performs the call.  Never fails; see [`GenerationClient::generate`].
    pub fn run(self) -> BoxFuture<'static, GenerationOutcome> {
        async move {
            let text = self.client.generate(&self.prompt).await;
            GenerationOutcome {
                request: self.id,
                text,
            }
        }
        .boxed()
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("id", &self.id)
            .field("prompt", &self.prompt)
            .field("model", self.client.model())
            .finish()
    }
}

/// The settled result of a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Which request this answers.
    pub request: RequestId,
    /// The response text (possibly the apology).
    pub text: String,
}

/// What the caller has to do after [`SessionController::submit`].
#[derive(Debug)]
pub enum Dispatch {
    /// Empty input; nothing changed.
    Ignored,
    /// Handled synchronously; the log may have changed.
    Handled,
    /// A chat line was logged and its prompt waits behind the in-flight request.
    Queued,
    /// A chat line was logged; run this request and settle it.
    Generate(GenerationRequest),
    /// The session is over.
    Exit,
}

struct QueuedPrompt {
    id: RequestId,
    prompt: String,
}

/// Owns the conversation state and routes every submitted line.
pub struct SessionController {
    state: SessionState,
    client: Option<GenerationClient>,
    next_message_id: u64,
    next_request_id: u64,
    in_flight: Option<RequestId>,
    queue: VecDeque<QueuedPrompt>,
    exited: bool,
}

impl SessionController {
    /// Creates a controller with a working generation client.
    pub fn new(client: GenerationClient) -> Self {
        let current_model = client.model().clone();
        Self::build(Some(client), current_model)
    }

    /// Creates a controller whose client failed to initialize.
    ///
    /// The failure is reported once as an assistant message; commands keep
    /// working and chat lines get [`NOT_INITIALIZED_MESSAGE`].
    pub fn uninitialized(error: &Error) -> Self {
        let mut controller = Self::build(None, Model::default());
        controller.push(
            Role::Assistant,
            format!(
                "Error initializing AI: {error}. Please ensure ANTHROPIC_API_KEY is set in your .env file."
            ),
        );
        controller
    }

    /// Creates a controller from the outcome of client construction.
    pub fn from_client(client: crate::Result<GenerationClient>) -> Self {
        match client {
            Ok(client) => Self::new(client),
            Err(err) => {
                tracing::warn!(error = %err, "generation client unavailable");
                Self::uninitialized(&err)
            }
        }
    }

    fn build(client: Option<GenerationClient>, current_model: Model) -> Self {
        Self {
            state: SessionState {
                current_model,
                ..SessionState::default()
            },
            client,
            next_message_id: 1,
            next_request_id: 1,
            in_flight: None,
            queue: VecDeque::new(),
            exited: false,
        }
    }

    /// The full session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The message log in display order.
    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    /// True while a backend call is outstanding.
    pub fn is_generating(&self) -> bool {
        self.state.is_generating
    }

    /// The model chat lines are sent to.
    pub fn current_model(&self) -> &Model {
        &self.state.current_model
    }

    /// True when a generation client is available.
    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    /// True once `/exit` has been submitted.
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Number of chat prompts waiting behind the in-flight request.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Records text typed but not yet submitted.
    pub fn set_pending_input(&mut self, input: impl Into<String>) {
        self.state.pending_input = input.into();
    }

    /// Interprets one submitted line.
    pub fn submit(&mut self, line: &str) -> Dispatch {
        if self.exited {
            return Dispatch::Exit;
        }
        if line.trim().is_empty() {
            return Dispatch::Ignored;
        }
        self.state.pending_input.clear();

        match commands::parse_command(line) {
            Some(command) => self.handle_command(command),
            None => self.handle_chat(line),
        }
    }

    fn handle_command(&mut self, command: ChatCommand) -> Dispatch {
        SESSION_COMMANDS.click();
        tracing::debug!(?command, "handling command");
        match command {
            ChatCommand::Exit => {
                self.exited = true;
                return Dispatch::Exit;
            }
            ChatCommand::Clear => {
                self.state.messages.clear();
                // Their user messages are gone; the in-flight request still lands.
                self.queue.clear();
            }
            ChatCommand::Help => {
                self.push(Role::Assistant, commands::help_text());
            }
            ChatCommand::ShowModel => {
                let overview = commands::model_overview(&self.state.current_model);
                self.push(Role::Assistant, overview);
            }
            ChatCommand::SwitchModel(name) => {
                let model = Model::from(name);
                if let Some(client) = self.client.as_mut() {
                    client.set_model(model.clone());
                }
                let confirmation = commands::model_switched(&model);
                self.state.current_model = model;
                self.push(Role::Assistant, confirmation);
            }
            ChatCommand::Unknown(line) => {
                self.push(Role::Assistant, commands::unknown_command(&line));
            }
        }
        Dispatch::Handled
    }

    fn handle_chat(&mut self, line: &str) -> Dispatch {
        SESSION_CHAT_MESSAGES.click();
        self.push(Role::User, line);

        if self.client.is_none() {
            self.push(Role::Assistant, NOT_INITIALIZED_MESSAGE);
            return Dispatch::Handled;
        }

        let id = self.allocate_request_id();
        if self.in_flight.is_some() {
            SESSION_QUEUED_PROMPTS.click();
            tracing::debug!(request = %id, "queueing prompt behind in-flight request");
            self.queue.push_back(QueuedPrompt {
                id,
                prompt: line.to_string(),
            });
            return Dispatch::Queued;
        }

        match self.issue(id, line.to_string()) {
            Some(request) => Dispatch::Generate(request),
            None => Dispatch::Handled,
        }
    }

    /// Records the outcome of the in-flight request.
    ///
    /// Appends the assistant message and returns the next queued request, if
    /// any.  Outcomes for any other request are ignored.
    pub fn settle(&mut self, outcome: GenerationOutcome) -> Option<GenerationRequest> {
        if self.in_flight != Some(outcome.request) {
            tracing::warn!(request = %outcome.request, "ignoring outcome for unknown request");
            return None;
        }
        tracing::debug!(request = %outcome.request, "generation settled");
        self.in_flight = None;
        self.push(Role::Assistant, outcome.text);

        let next = self
            .queue
            .pop_front()
            .and_then(|queued| self.issue(queued.id, queued.prompt));
        if next.is_none() {
            self.state.is_generating = false;
        }
        next
    }

    fn issue(&mut self, id: RequestId, prompt: String) -> Option<GenerationRequest> {
        let client = self.client.clone()?;
        tracing::debug!(request = %id, model = %client.model(), "issuing generation");
        self.in_flight = Some(id);
        self.state.is_generating = true;
        Some(GenerationRequest { id, prompt, client })
    }

    fn allocate_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        id
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.state.messages.push(Message {
            id,
            role,
            content: content.into(),
        });
    }
}
