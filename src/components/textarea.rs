//! Multi-line text area adapter. Enter inserts a newline; `ctrl+s` submits.

use serde::Deserialize;
use serde_json::Value;

use crate::config::AdapterDefaults;
use crate::core::binding::BindingTable;
use crate::core::bubble::{Interception, UpdateResult};
use crate::core::command::Command;
use crate::core::component::{
    parse_props, CommonProps, Component, ComponentBase, ComponentKind, Focusable,
};
use crate::core::dispatch::{
    dispatch, BindingProvider, Delegate, Dispatchable, Observable, SpecialKeyHandler,
};
use crate::core::event_bus::names;
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::message::Message;
use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
use crate::core::special_keys::{escape_blur, submit_value, swallow, tab_bubbles, SpecialKey};
use crate::error::ConfigError;
use crate::widgets::TextArea;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextAreaProps {
    #[serde(flatten)]
    common: CommonProps,
    value: Option<String>,
    height: Option<usize>,
}

pub struct TextAreaComponent {
    base: ComponentBase,
    area: TextArea,
}

impl TextAreaComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            area: TextArea::new(defaults),
        }
    }

    pub fn value(&self) -> String {
        self.area.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.area.set_value(value);
    }

    fn submit(&self) -> Interception {
        submit_value(self.base.id(), &self.area.value(), names::SUBMITTED)
    }
}

impl BindingProvider for TextAreaComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "submit" => self.submit(),
            "clear" => {
                self.area.clear();
                swallow()
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for TextAreaComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        if key.ctrl && !key.alt && key.code == KeyCode::Char('s') {
            return self.submit();
        }
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for TextAreaComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.area.update(message)
    }
}

impl Observable for TextAreaComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(fields::VALUE, FieldValue::Text(self.area.value()))
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for TextAreaComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for TextAreaComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for TextAreaComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.area.render(width, self.base.is_focused())
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::TextArea
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: TextAreaProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.height == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "height",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if let Some(value) = props.value {
            self.area.set_value(&value);
        }
        if let Some(height) = props.height {
            self.area.set_height(height);
        }
        Ok(())
    }

    fn take_state_changes(&mut self) -> Vec<FieldChange> {
        self.base.take_changes()
    }

    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::TextAreaComponent;
    use crate::config::AdapterDefaults;
    use crate::core::bubble::BubbleSignal;
    use crate::core::component::Component;
    use crate::core::event_bus::names;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::Message;
    use crate::error::ConfigError;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn area() -> TextAreaComponent {
        let mut area = TextAreaComponent::new("notes", &AdapterDefaults::default());
        area.set_focus(true);
        area
    }

    #[test]
    fn enter_is_delegated_as_newline() {
        let mut area = area();
        area.set_value("a");
        let result = area.update(Message::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(result.is_handled());
        assert_eq!(area.value(), "a\n");
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::VALUE_CHANGED);
    }

    #[test]
    fn ctrl_s_submits_and_keeps_value() {
        let mut area = area();
        area.set_value("line one\nline two");
        let result = area.update(Message::Key(KeyEvent::char('s').with_ctrl()));
        assert_eq!(result.signal, BubbleSignal::Handled);
        let events = result.command.notifications();
        assert_eq!(events[0].name, names::SUBMITTED);
        assert_eq!(events[0].get("value"), Some(&json!("line one\nline two")));
        assert_eq!(area.value(), "line one\nline two");
    }

    #[test]
    fn ctrl_s_on_empty_is_swallowed() {
        let mut area = area();
        let result = area.update(Message::Key(KeyEvent::char('s').with_ctrl()));
        assert!(result.is_handled());
        assert!(result.command.is_none());
    }

    #[test]
    fn zero_height_is_rejected() {
        let mut area = area();
        area.set_value("keep");
        assert_matches!(
            area.apply_config(&json!({ "height": 0, "value": "replace" })),
            Err(ConfigError::OutOfRange { field: "height", .. })
        );
        assert_eq!(area.value(), "keep");
    }
}
