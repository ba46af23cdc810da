//! Outbound notifications for the host's pub/sub bus.
//!
//! The core never delivers anything itself: it wraps each notification in a
//! [`Command::Publish`] and the host forwards it.

use serde_json::{Map, Value};

use crate::core::command::Command;

/// Event names published by the adapters.
pub mod names {
    pub const VALUE_CHANGED: &str = "value_changed";
    pub const FOCUS_CHANGED: &str = "focus_changed";
    pub const SELECTION_CHANGED: &str = "selection_changed";
    pub const SELECTED_CHANGED: &str = "selected_changed";
    pub const SCROLLED: &str = "scrolled";
    pub const SUBMITTED: &str = "submitted";
    pub const MESSAGE_SENT: &str = "message_sent";
    pub const ESCAPE_PRESSED: &str = "escape_pressed";
    pub const ITEM_SELECTED: &str = "item_selected";
    pub const ROW_SELECTED: &str = "row_selected";
    pub const ACTION_TRIGGERED: &str = "action_triggered";
    pub const SUBMENU_ENTERED: &str = "submenu_entered";
    pub const SUBMENU_EXITED: &str = "submenu_exited";
    pub const BINDING_TRIGGERED: &str = "binding_triggered";
    pub const PROGRESS_COMPLETED: &str = "progress_completed";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub source_id: String,
    pub name: String,
    pub payload: Map<String, Value>,
}

impl NotificationEvent {
    pub fn new(source_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            name: name.into(),
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Wrap into the deferred command the host schedules.
    pub fn publish(self) -> Command {
        tracing::debug!(
            target: crate::logging::DISPATCH_TARGET,
            source = %self.source_id,
            event = %self.name,
            "notification queued"
        );
        Command::Publish(self)
    }
}

pub fn value_changed(source_id: &str, old: &str, new: &str) -> NotificationEvent {
    NotificationEvent::new(source_id, names::VALUE_CHANGED)
        .with("old", old)
        .with("new", new)
}

pub fn focus_changed(source_id: &str, focused: bool) -> NotificationEvent {
    NotificationEvent::new(source_id, names::FOCUS_CHANGED).with("focused", focused)
}

pub fn escape_pressed(source_id: &str) -> NotificationEvent {
    NotificationEvent::new(source_id, names::ESCAPE_PRESSED)
}

pub fn submitted(source_id: &str, value: &str) -> NotificationEvent {
    NotificationEvent::new(source_id, names::SUBMITTED).with("value", value)
}

/// Split every publish out of `command`, keeping the remaining commands in order.
pub fn drain_notifications(command: Command) -> (Vec<NotificationEvent>, Command) {
    let mut events = Vec::new();
    let mut rest = Vec::new();
    collect(command, &mut events, &mut rest);
    (events, Command::batch(rest))
}

fn collect(command: Command, events: &mut Vec<NotificationEvent>, rest: &mut Vec<Command>) {
    match command {
        Command::None => {}
        Command::Publish(event) => events.push(event),
        Command::Batch(commands) => {
            for command in commands {
                collect(command, events, rest);
            }
        }
        other => rest.push(other),
    }
}
