//! Typed events between the capture, command, and history components.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A command entered the pipeline, spoken or typed.
    Transcribed(String),
    /// Code executed successfully; the history side logs it.
    Executed { command: String, code: String },
}

pub type EventSender = UnboundedSender<SessionEvent>;
pub type EventReceiver = UnboundedReceiver<SessionEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    unbounded_channel()
}
