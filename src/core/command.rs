//! Deferred commands returned to the host runtime.
//!
//! Commands are values, never side effects: the host decides when (and
//! whether) to run them and redelivers their results as new messages.

use std::time::Duration;

use crate::core::event_bus::NotificationEvent;
use crate::core::message::{Message, TickMessage};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Command {
    #[default]
    None,
    Batch(Vec<Command>),
    Publish(NotificationEvent),
    /// Redeliver `Message::Tick(tick)` after `after` has elapsed.
    Tick { tick: TickMessage, after: Duration },
    /// Redeliver `Message` on the next turn of the host loop.
    Deliver(Message),
}

impl Command {
    pub fn none() -> Self {
        Command::None
    }

    /// Combine commands in order, flattening nested batches and dropping
    /// `None`. A single survivor is returned unwrapped.
    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut flat = Vec::new();
        for command in commands {
            match command {
                Command::None => {}
                Command::Batch(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Command::None,
            1 => flat.pop().unwrap_or_default(),
            _ => Command::Batch(flat),
        }
    }

    /// Append `next` after `self`.
    pub fn then(self, next: Command) -> Self {
        Command::batch([self, next])
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    /// Every notification in order, without consuming the command.
    pub fn notifications(&self) -> Vec<&NotificationEvent> {
        let mut out = Vec::new();
        self.visit_notifications(&mut out);
        out
    }

    fn visit_notifications<'a>(&'a self, out: &mut Vec<&'a NotificationEvent>) {
        match self {
            Command::Publish(event) => out.push(event),
            Command::Batch(commands) => {
                for command in commands {
                    command.visit_notifications(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Command;
    use crate::core::event_bus::{focus_changed, submitted};
    use crate::core::message::Message;
    use crate::core::key::KeyEvent;
    use serde_json::Value;

    #[test]
    fn batch_flattens_and_drops_none() {
        let command = Command::batch(vec![
            Command::None,
            Command::batch(vec![submitted("a", "x").publish(), Command::None]),
            focus_changed("a", true).publish(),
        ]);
        match &command {
            Command::Batch(inner) => assert_eq!(inner.len(), 2),
            other => panic!("expected batch, got {other:?}"),
        }
        assert_eq!(command.notifications().len(), 2);
    }

    #[test]
    fn batch_of_one_is_unwrapped() {
        let deliver = Command::Deliver(Message::Key(KeyEvent::char('x')));
        assert_eq!(Command::batch(vec![Command::None, deliver.clone()]), deliver);
        assert!(Command::batch(Vec::new()).is_none());
    }

    #[test]
    fn then_keeps_order() {
        let command = submitted("a", "1").publish().then(submitted("a", "2").publish());
        let values: Vec<_> = command
            .notifications()
            .iter()
            .map(|event| event.get("value").cloned())
            .collect();
        assert_eq!(
            values,
            vec![Some(Value::from("1")), Some(Value::from("2"))]
        );
    }
}
