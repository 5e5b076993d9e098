//! The single-task event loop driving a [`SessionController`].
//!
//! Submitted lines and finished generations are multiplexed with
//! `tokio::select!` on one task, so the controller is only ever touched from
//! one place and input stays live while a generation is running.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;

use crate::chat::render::{Renderer, TranscriptView};
use crate::chat::session::{Dispatch, SessionController};

/// An event produced by the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line.
    Line(String),
    /// Text typed so far, not yet submitted.
    Pending(String),
    /// The reserved cancel key (Escape, Ctrl-C, Ctrl-D).  Ends the session.
    Cancel,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/exit` was submitted.
    Exit,
    /// The cancel key was pressed.
    Cancelled,
    /// The input channel closed.
    InputClosed,
}

/// Runs the session until it ends.
///
/// Generations still in flight when the session ends are dropped.
pub async fn run<R: Renderer + ?Sized>(
    controller: &mut SessionController,
    mut input: mpsc::UnboundedReceiver<InputEvent>,
    renderer: &mut R,
) -> SessionEnd {
    let mut view = TranscriptView::new();
    let mut in_flight = FuturesUnordered::new();
    view.render(controller.messages(), controller.is_generating(), renderer);

    loop {
        tokio::select! {
            event = input.recv() => match event {
                Some(InputEvent::Line(line)) => match controller.submit(&line) {
                    Dispatch::Exit => return SessionEnd::Exit,
                    Dispatch::Generate(request) => in_flight.push(request.run()),
                    Dispatch::Ignored | Dispatch::Handled | Dispatch::Queued => {}
                },
                Some(InputEvent::Pending(text)) => controller.set_pending_input(text),
                Some(InputEvent::Cancel) => return SessionEnd::Cancelled,
                None => return SessionEnd::InputClosed,
            },
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                if let Some(next) = controller.settle(outcome) {
                    in_flight.push(next.run());
                }
            }
        }
        view.render(controller.messages(), controller.is_generating(), renderer);
    }
}
