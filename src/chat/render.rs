//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows
//! for different output styles.  The default implementation uses ANSI
//! escape codes to tell assistant and user messages apart.  While a line
//! editor owns the terminal, output goes through its external printer so the
//! prompt is redrawn below it.

use std::io::{self, Stdout, Write};
use std::path::Path;

use rustyline::ExternalPrinter;

use crate::chat::session::{Message, Role};
use crate::types::Model;

/// ANSI escape code for dim text (used for user messages and hints).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for yellow text (used for the assistant marker).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

const ASSISTANT_MARKER: &str = "❯ 🤖";
const USER_MARKER: &str = "›";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one message of the log.
    fn print_message(&mut self, message: &Message);

    /// Show the processing indicator.
    fn print_thinking(&mut self);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    printer: Option<Box<dyn ExternalPrinter + Send>>,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            printer: None,
            use_color,
        }
    }

    /// Routes all further output through a line editor's external printer.
    pub fn with_printer(mut self, printer: Box<dyn ExternalPrinter + Send>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Prints the welcome banner.
    pub fn print_banner(&mut self, model: &Model, cwd: &Path) {
        let (bold, dim, reset) = if self.use_color {
            (ANSI_BOLD, ANSI_DIM, ANSI_RESET)
        } else {
            ("", "", "")
        };
        self.emit(format!(
            " Welcome to {bold}agent-chat{reset}! (model: {model})\n \
             {dim}/help for help{reset}\n \
             {dim}cwd: {}{reset}\n\n \
             {dim}What are you going to build today?{reset}\n",
            cwd.display()
        ));
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, text: String) {
        if let Some(printer) = self.printer.as_mut() {
            match printer.print(text.clone()) {
                Ok(()) => return,
                Err(err) => {
                    tracing::debug!(error = %err, "external printer failed; writing to stdout");
                    self.printer = None;
                }
            }
        }
        let _ = writeln!(self.stdout, "{text}");
        let _ = self.stdout.flush();
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        let line = match message.role {
            Role::Assistant => format!(
                "{} {}",
                self.styled(ANSI_YELLOW, ASSISTANT_MARKER),
                message.content
            ),
            Role::User => self.styled(ANSI_DIM, &format!("{USER_MARKER} {}", message.content)),
        };
        self.emit(format!("{line}\n"));
    }

    fn print_thinking(&mut self) {
        let line = self.styled(ANSI_YELLOW, &format!("{ASSISTANT_MARKER} Thinking..."));
        self.emit(format!("{line}\n"));
    }

    fn print_info(&mut self, info: &str) {
        let line = self.styled(ANSI_DIM, info);
        self.emit(line);
    }
}

/// Tracks what has already been shown so only new log entries are printed.
#[derive(Debug, Default)]
pub struct TranscriptView {
    last_shown: u64,
    shown_len: usize,
    was_generating: bool,
}

impl TranscriptView {
    /// Creates a view that has shown nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every log entry newer than the last call, followed by the
    /// indicator while a generation is outstanding.
    pub fn render<R: Renderer + ?Sized>(
        &mut self,
        messages: &[Message],
        is_generating: bool,
        renderer: &mut R,
    ) {
        if messages.len() < self.shown_len {
            renderer.print_info("Conversation cleared.");
        }
        let mut printed = false;
        let last_shown = self.last_shown;
        for message in messages.iter().filter(|m| m.id > last_shown) {
            renderer.print_message(message);
            self.last_shown = message.id;
            printed = true;
        }
        self.shown_len = messages.len();
        // The indicator always trails the newest message while a call is out.
        if is_generating && (printed || !self.was_generating) {
            renderer.print_thinking();
        }
        self.was_generating = is_generating;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl Renderer for Recorder {
        fn print_message(&mut self, message: &Message) {
            self.lines.push(format!("{:?}:{}", message.role, message.content));
        }

        fn print_thinking(&mut self) {
            self.lines.push("thinking".to_string());
        }

        fn print_info(&mut self, info: &str) {
            self.lines.push(format!("info:{info}"));
        }
    }

    fn message(id: u64, role: Role, content: &str) -> Message {
        Message {
            id,
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn only_new_messages_are_printed() {
        let mut view = TranscriptView::new();
        let mut recorder = Recorder::default();
        let mut log = vec![message(1, Role::User, "hi")];
        view.render(&log, true, &mut recorder);
        log.push(message(2, Role::Assistant, "hello"));
        view.render(&log, false, &mut recorder);
        assert_eq!(
            recorder.lines,
            vec!["User:hi", "thinking", "Assistant:hello"]
        );
    }

    #[test]
    fn clearing_is_announced() {
        let mut view = TranscriptView::new();
        let mut recorder = Recorder::default();
        view.render(&[message(1, Role::Assistant, "help")], false, &mut recorder);
        view.render(&[], false, &mut recorder);
        view.render(&[message(2, Role::Assistant, "again")], false, &mut recorder);
        assert_eq!(
            recorder.lines,
            vec![
                "Assistant:help",
                "info:Conversation cleared.",
                "Assistant:again"
            ]
        );
    }

    #[test]
    fn plain_renderer_without_color_has_no_escapes() {
        let renderer = PlainTextRenderer::with_color(false);
        assert_eq!(renderer.styled(ANSI_YELLOW, "x"), "x");
        let renderer = PlainTextRenderer::with_color(true);
        assert_eq!(renderer.styled(ANSI_YELLOW, "x"), "\x1b[33mx\x1b[0m");
    }

    #[derive(Clone, Default)]
    struct Captured {
        printed: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ExternalPrinter for Captured {
        fn print(&mut self, msg: String) -> rustyline::Result<()> {
            if self.fail {
                return Err(rustyline::error::ReadlineError::Interrupted);
            }
            self.printed.lock().unwrap().push(msg);
            Ok(())
        }
    }

    #[test]
    fn output_goes_through_the_editor_printer() {
        let captured = Captured::default();
        let mut renderer =
            PlainTextRenderer::with_color(false).with_printer(Box::new(captured.clone()));
        let mut view = TranscriptView::new();
        view.render(&[message(1, Role::User, "hello")], true, &mut renderer);
        view.render(
            &[message(1, Role::User, "hello"), message(2, Role::Assistant, "hi")],
            false,
            &mut renderer,
        );
        assert_eq!(
            *captured.printed.lock().unwrap(),
            vec!["› hello\n", "❯ 🤖 Thinking...\n", "❯ 🤖 hi\n"]
        );
        assert!(renderer.printer.is_some());
    }

    #[test]
    fn failing_printer_is_dropped() {
        let captured = Captured {
            fail: true,
            ..Captured::default()
        };
        let mut renderer =
            PlainTextRenderer::with_color(false).with_printer(Box::new(captured.clone()));
        renderer.print_info("still shown");
        assert!(renderer.printer.is_none());
        assert!(captured.printed.lock().unwrap().is_empty());
    }
}
