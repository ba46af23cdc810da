//! Scrollable viewport adapter.

use serde::Deserialize;
use serde_json::Value;

use crate::config::AdapterDefaults;
use crate::core::binding::BindingTable;
use crate::core::bubble::{BubbleSignal, Interception, UpdateResult};
use crate::core::command::Command;
use crate::core::component::{
    parse_props, CommonProps, Component, ComponentBase, ComponentKind, Focusable,
};
use crate::core::dispatch::{
    dispatch, BindingProvider, Delegate, Dispatchable, Observable, SpecialKeyHandler,
};
use crate::core::key::KeyEvent;
use crate::core::message::Message;
use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
use crate::core::special_keys::{escape_blur, swallow, tab_bubbles, SpecialKey};
use crate::error::ConfigError;
use crate::widgets::Viewport;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewportProps {
    #[serde(flatten)]
    common: CommonProps,
    content: Option<String>,
    height: Option<usize>,
    wrap: Option<bool>,
    follow: Option<bool>,
}

pub struct ViewportComponent {
    base: ComponentBase,
    viewport: Viewport,
    wrap: bool,
    /// Stick to the bottom when content grows.
    follow: bool,
}

impl ViewportComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            viewport: Viewport::new(defaults),
            wrap: true,
            follow: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let was_at_bottom = self.viewport.at_bottom();
        self.viewport.set_content(content);
        if self.follow && was_at_bottom {
            self.viewport.scroll_to_bottom();
        }
    }

    pub fn set_height(&mut self, height: usize) {
        self.viewport.set_height(height);
    }
}

impl BindingProvider for ViewportComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "scroll_bottom" => {
                self.viewport.scroll_to_bottom();
                swallow()
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for ViewportComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for ViewportComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.viewport.update(message)
    }

    /// A scroll key at the edge bubbles so an outer container can scroll.
    fn passthrough_signal(&self) -> BubbleSignal {
        BubbleSignal::Ignored
    }
}

impl Observable for ViewportComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(fields::OFFSET, FieldValue::Number(self.viewport.offset() as i64))
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for ViewportComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for ViewportComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for ViewportComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.viewport.set_wrap_width(if self.wrap { width } else { 0 });
        self.viewport.render(width)
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Viewport
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: ViewportProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.height == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "height",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if let Some(wrap) = props.wrap {
            self.wrap = wrap;
        }
        if let Some(follow) = props.follow {
            self.follow = follow;
        }
        if let Some(height) = props.height {
            self.viewport.set_height(height);
        }
        if let Some(content) = props.content {
            self.set_content(content);
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
