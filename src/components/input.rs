//! Single-line input adapter.

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
use crate::core::key::KeyEvent;
use crate::core::message::Message;
use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
use crate::core::special_keys::{escape_blur, submit_value, swallow, tab_bubbles, SpecialKey};
use crate::error::ConfigError;
use crate::widgets::TextInput;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InputProps {
    #[serde(flatten)]
    common: CommonProps,
    value: Option<String>,
    placeholder: Option<String>,
    prompt: Option<String>,
}

pub struct InputComponent {
    base: ComponentBase,
    input: TextInput,
}

impl InputComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            input: TextInput::new(defaults),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.input.set_value(value);
    }

    pub fn set_bindings(&mut self, bindings: BindingTable) {
        self.base.set_bindings(bindings);
    }

    /// Publish the value and clear the field; empty values are swallowed.
    fn submit(&mut self) -> Interception {
        let value = self.input.value().to_string();
        if !value.is_empty() {
            self.input.clear();
        }
        submit_value(self.base.id(), &value, names::SUBMITTED)
    }
}

impl BindingProvider for InputComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "submit" => self.submit(),
            "clear" => {
                self.input.clear();
                swallow()
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for InputComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            Some(SpecialKey::Enter) => self.submit(),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for InputComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.input.update(message)
    }
}

impl Observable for InputComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(fields::VALUE, FieldValue::Text(self.input.value().to_string()))
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for InputComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for InputComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for InputComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.input.render(width, self.base.is_focused())
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Input
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: InputProps = parse_props(self.kind(), self.base.id(), props)?;
        self.base.apply_common(props.common)?;
        if let Some(value) = props.value {
            self.input.set_value(value);
        }
        if let Some(placeholder) = props.placeholder {
            self.input.set_placeholder(placeholder);
        }
        if let Some(prompt) = props.prompt {
            self.input.set_prompt(prompt);
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
