//! Messages delivered to components by the host runtime.

use serde_json::Value;

use crate::core::key::KeyEvent;

/// One message delivered to a component's update entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Paste(String),
    Resize { columns: u16, rows: u16 },
    Tick(TickMessage),
    Targeted(Envelope),
    Action(ActionMessage),
    Custom { name: String, payload: Value },
}

impl Message {
    pub fn key(key: KeyEvent) -> Self {
        Message::Key(key)
    }

    /// Wrap `inner` so that only the component with `target_id` acts on it.
    pub fn targeted(target_id: impl Into<String>, inner: Message) -> Self {
        Message::Targeted(Envelope {
            target_id: target_id.into(),
            inner: Box::new(inner),
        })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Key(_) => MessageKind::Key,
            Message::Paste(_) => MessageKind::Paste,
            Message::Resize { .. } => MessageKind::Resize,
            Message::Tick(_) => MessageKind::Tick,
            Message::Targeted(_) => MessageKind::Targeted,
            Message::Action(_) => MessageKind::Action,
            Message::Custom { .. } => MessageKind::Custom,
        }
    }

    /// Keyboard messages are the ones subject to the focus gate.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Message::Key(_) | Message::Paste(_))
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Message::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Message {
    fn from(key: KeyEvent) -> Self {
        Message::Key(key)
    }
}

/// Payload-free discriminant of [`Message`], used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Key,
    Paste,
    Resize,
    Tick,
    Targeted,
    Action,
    Custom,
}

/// A message addressed to exactly one component id.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub target_id: String,
    pub inner: Box<Message>,
}

/// Framework-level action replay, distinct from raw input.
///
/// An empty `component_id` addresses whichever component receives it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMessage {
    pub component_id: String,
    pub action: String,
    pub payload: Value,
}

/// Redelivered result of a [`Command::Tick`](crate::core::command::Command::Tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMessage {
    pub id: String,
    pub tag: u64,
}

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

/// Turn one chunk of raw terminal input into messages.
///
/// Bracketed paste becomes [`Message::Paste`]; a recognized key sequence
/// becomes one [`Message::Key`]; a run of printable text becomes one key
/// message per character. Unrecognized sequences are dropped.
pub fn parse_input(data: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut remaining = data;
    loop {
        let Some(start) = remaining.find(PASTE_START) else {
            parse_keys(remaining, &mut messages);
            break;
        };

        parse_keys(&remaining[..start], &mut messages);

        let after_start = &remaining[start + PASTE_START.len()..];
        let Some(end_rel) = after_start.find(PASTE_END) else {
            tracing::debug!(
                target: crate::logging::DISPATCH_TARGET,
                "unterminated bracketed paste dropped"
            );
            break;
        };

        messages.push(Message::Paste(after_start[..end_rel].to_string()));
        remaining = &after_start[end_rel + PASTE_END.len()..];
        if remaining.is_empty() {
            break;
        }
    }
    messages
}

fn parse_keys(data: &str, out: &mut Vec<Message>) {
    if data.is_empty() {
        return;
    }
    if let Some(key) = KeyEvent::from_raw(data) {
        out.push(Message::Key(key));
        return;
    }
    if data.chars().all(|ch| !ch.is_control()) {
        out.extend(data.chars().map(|ch| Message::Key(KeyEvent::char(ch))));
        return;
    }
    tracing::debug!(
        target: crate::logging::DISPATCH_TARGET,
        raw = ?data,
        "unrecognized input sequence dropped"
    );
}
