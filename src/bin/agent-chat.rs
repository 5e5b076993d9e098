//! Interactive chat application.
//!
//! # Usage
//!
//! ```bash
//! # Reads ANTHROPIC_API_KEY from the environment or ./.env
//! agent-chat
//!
//! # Specify a model
//! agent-chat --model claude-3-5-haiku-20241022
//!
//! # Disable colors (useful for piping output)
//! agent-chat --no-color
//! ```
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/model [name]` - Show or change the model
//! - `/exit` - Exit the application (Escape, Ctrl-C and Ctrl-D work too)

use std::thread;

use arrrg::CommandLine;
use rustyline::error::ReadlineError;
use rustyline::{Cmd, DefaultEditor, ExternalPrinter, KeyCode, KeyEvent, Modifiers};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_chat::GenerationClient;
use agent_chat::chat::{
    ChatArgs, ChatCommand, ChatConfig, InputEvent, PlainTextRenderer, SessionController,
    SessionEnd, parse_command, run,
};

const PROMPT: &str = "› ";

/// Main entry point for the agent-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("agent-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let filter = if config.verbose {
        "agent_chat=debug"
    } else {
        "agent_chat=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut controller =
        SessionController::from_client(GenerationClient::new(config.generation_config()));
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    renderer.print_banner(controller.current_model(), &std::env::current_dir()?);

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = spawn_input_thread(tx);
    // Replies arrive while the prompt is drawn; the editor must redraw it.
    let mut renderer = match printer.await {
        Ok(Some(printer)) => renderer.with_printer(printer),
        _ => renderer,
    };

    match run(&mut controller, rx, &mut renderer).await {
        SessionEnd::Exit | SessionEnd::Cancelled => println!("Goodbye!"),
        SessionEnd::InputClosed => {
            tracing::debug!("input closed");
            println!("\nGoodbye!");
        }
    }

    Ok(())
}

type BoxedPrinter = Box<dyn ExternalPrinter + Send>;

/// Reads lines on a dedicated thread so the session stays responsive.
///
/// The returned receiver yields the editor's external printer, or `None` when
/// the terminal does not support one.
fn spawn_input_thread(
    tx: mpsc::UnboundedSender<InputEvent>,
) -> oneshot::Receiver<Option<BoxedPrinter>> {
    let (printer_tx, printer_rx) = oneshot::channel();
    thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                tracing::error!(error = %err, "could not open line editor");
                let _ = printer_tx.send(None);
                let _ = tx.send(InputEvent::Cancel);
                return;
            }
        };
        rl.bind_sequence(KeyEvent(KeyCode::Esc, Modifiers::NONE), Cmd::Interrupt);
        let printer = match rl.create_external_printer() {
            Ok(printer) => Some(Box::new(printer) as BoxedPrinter),
            Err(err) => {
                tracing::debug!(error = %err, "no external printer; writing to stdout");
                None
            }
        };
        let _ = printer_tx.send(printer);

        loop {
            let event = match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => InputEvent::Cancel,
                Err(err) => {
                    tracing::error!(error = %err, "input error");
                    InputEvent::Cancel
                }
            };
            // Stop before prompting again so the terminal is restored on exit.
            let last = match &event {
                InputEvent::Line(line) => parse_command(line) == Some(ChatCommand::Exit),
                InputEvent::Cancel => true,
                InputEvent::Pending(_) => false,
            };
            if tx.send(event).is_err() || last {
                break;
            }
        }
    });
    printer_rx
}
