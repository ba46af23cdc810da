//! Building blocks for per-kind special-key handlers.

use crate::core::bubble::Interception;
use crate::core::command::Command;
use crate::core::component::ComponentBase;
use crate::core::event_bus::{escape_pressed, focus_changed, NotificationEvent};
use crate::core::key::{KeyCode, KeyEvent};

/// Keys with cross-component meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Tab,
    BackTab,
    Escape,
    Enter,
}

impl SpecialKey {
    pub fn classify(key: &KeyEvent) -> Option<Self> {
        if key.ctrl || key.alt {
            return None;
        }
        match (key.code, key.shift) {
            (KeyCode::Tab, false) => Some(SpecialKey::Tab),
            (KeyCode::Tab, true) => Some(SpecialKey::BackTab),
            (KeyCode::Escape, false) => Some(SpecialKey::Escape),
            (KeyCode::Enter, false) => Some(SpecialKey::Enter),
            _ => None,
        }
    }

    pub fn is_focus_traversal(self) -> bool {
        matches!(self, SpecialKey::Tab | SpecialKey::BackTab)
    }
}

/// Tab and Shift+Tab belong to the host's focus traversal.
pub fn tab_bubbles() -> Interception {
    Interception::bubble(Command::None)
}

/// Drop focus and tell the host about it.
///
/// The key still bubbles so an ancestor can close a dialog or move focus.
pub fn escape_blur(base: &mut ComponentBase) -> Interception {
    base.set_focused(false);
    let id = base.id();
    Interception::bubble(Command::batch([
        focus_changed(id, false).publish(),
        escape_pressed(id).publish(),
    ]))
}

/// Enter on an editable value.
///
/// An empty value is swallowed. Otherwise `event` is published with the
/// value under `"value"`; clearing the widget is the caller's business.
pub fn submit_value(source_id: &str, value: &str, event: &str) -> Interception {
    if value.is_empty() {
        return swallow();
    }
    Interception::handled(
        NotificationEvent::new(source_id, event)
            .with("value", value)
            .publish(),
    )
}

/// Claim the key, do nothing, stop propagation.
pub fn swallow() -> Interception {
    Interception::handled(Command::None)
}
