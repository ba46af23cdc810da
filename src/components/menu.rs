//! Hierarchical menu adapter.
//!
//! Navigation is a small state machine: `Root` (level 0, empty path) and
//! `Submenu(level, path)`. Enter on an item with children descends, Escape
//! ascends one level, and Escape at the root blurs the menu like any other
//! component.

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
use crate::core::event_bus::{names, NotificationEvent};
use crate::core::key::KeyEvent;
use crate::core::message::Message;
use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
use crate::core::special_keys::{escape_blur, swallow, tab_bubbles, SpecialKey};
use crate::error::ConfigError;
use crate::widgets::{SelectItem, SelectList};

const PATH_FIELD: &str = "path";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Payload published with `action_triggered` when a leaf is chosen.
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            action: None,
            children: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Value) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenuProps {
    #[serde(flatten)]
    common: CommonProps,
    items: Option<Vec<MenuItem>>,
    max_visible: Option<usize>,
}

pub struct MenuComponent {
    base: ComponentBase,
    list: SelectList,
    submenu_marker: String,
    /// Items shown at the current level.
    items: Vec<MenuItem>,
    /// Parent levels, innermost last. `parents.len() == path.len()`.
    parents: Vec<Vec<MenuItem>>,
    path: Vec<String>,
}

impl MenuComponent {
    pub fn new(id: impl Into<String>, items: Vec<MenuItem>, defaults: &AdapterDefaults) -> Self {
        let mut menu = Self {
            base: ComponentBase::new(id),
            list: SelectList::new(Vec::new(), defaults),
            submenu_marker: defaults.submenu_marker.clone(),
            items: Vec::new(),
            parents: Vec::new(),
            path: Vec::new(),
        };
        menu.load_root(items);
        menu
    }

    pub fn level(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.list.selected_index()
    }

    fn load_root(&mut self, items: Vec<MenuItem>) {
        self.parents.clear();
        self.path.clear();
        self.show(items);
    }

    /// Make `items` the current level and select the first one.
    fn show(&mut self, items: Vec<MenuItem>) {
        let rows = items
            .iter()
            .map(|item| {
                let mut row = SelectItem::new(item.title.clone());
                row.description = item.description.clone();
                if item.has_children() {
                    row = row.with_marker(self.submenu_marker.clone());
                }
                row
            })
            .collect();
        self.list.set_items(rows);
        self.items = items;
    }

    fn path_json(path: &[String]) -> Value {
        Value::from(path.to_vec())
    }

    fn transition_event(&self, name: &str, previous: &[String]) -> NotificationEvent {
        NotificationEvent::new(self.base.id(), name)
            .with("previous_path", Self::path_json(previous))
            .with("path", Self::path_json(&self.path))
            .with("level", self.level())
    }

    fn enter_submenu(&mut self, index: usize) -> Interception {
        let previous = self.path.clone();
        let children = self.items[index].children.clone();
        self.path.push(self.items[index].title.clone());
        let parent = std::mem::take(&mut self.items);
        self.parents.push(parent);
        self.show(children);
        tracing::trace!(
            target: crate::logging::DISPATCH_TARGET,
            menu = self.base.id(),
            level = self.level(),
            "entered submenu"
        );
        Interception::handled(self.transition_event(names::SUBMENU_ENTERED, &previous).publish())
    }

    fn exit_submenu(&mut self) -> Interception {
        let Some(parent) = self.parents.pop() else {
            return escape_blur(&mut self.base);
        };
        let previous = self.path.clone();
        self.path.pop();
        self.show(parent);
        Interception::handled(self.transition_event(names::SUBMENU_EXITED, &previous).publish())
    }

    fn choose_leaf(&self, index: usize) -> Interception {
        let item = &self.items[index];
        let selected = NotificationEvent::new(self.base.id(), names::ITEM_SELECTED)
            .with("index", index)
            .with("title", item.title.as_str())
            .with("path", Self::path_json(&self.path))
            .publish();
        let triggered = item.action.as_ref().map(|action| {
            NotificationEvent::new(self.base.id(), names::ACTION_TRIGGERED)
                .with("action", action.clone())
                .with("title", item.title.as_str())
                .with("path", Self::path_json(&self.path))
                .publish()
        });
        Interception::handled(Command::batch([selected, triggered.unwrap_or_default()]))
    }

    fn activate(&mut self) -> Interception {
        let index = self.list.selected_index();
        match self.items.get(index) {
            None => swallow(),
            Some(item) if item.has_children() => self.enter_submenu(index),
            Some(_) => self.choose_leaf(index),
        }
    }
}

impl BindingProvider for MenuComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "activate" => self.activate(),
            "back" => self.exit_submenu(),
            "root" => {
                if self.parents.is_empty() {
                    return swallow();
                }
                let previous = self.path.clone();
                let root = self.parents.swap_remove(0);
                self.load_root(root);
                Interception::handled(
                    self.transition_event(names::SUBMENU_EXITED, &previous).publish(),
                )
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for MenuComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => self.exit_submenu(),
            Some(SpecialKey::Enter) => self.activate(),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for MenuComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.list.update(message)
    }
}

impl Observable for MenuComponent {
    fn capture(&self) -> ObservableState {
        let index = self.list.selected_index();
        ObservableState::new()
            .with(
                fields::INDEX,
                FieldValue::Selection {
                    index,
                    item: self
                        .items
                        .get(index)
                        .map(|item| Value::from(item.title.as_str())),
                },
            )
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
            .with(PATH_FIELD, FieldValue::Json(Self::path_json(&self.path)))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for MenuComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for MenuComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for MenuComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.path.is_empty() {
            lines.push(crate::core::text::truncate_to_width(
                &self.path.join(" › "),
                width,
                "…",
            ));
        }
        lines.extend(self.list.render(width));
        lines
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Menu
    }

    /// New items reset navigation to the root.
    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: MenuProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.max_visible == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "max_visible",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if let Some(max_visible) = props.max_visible {
            self.list.set_max_visible(max_visible);
        }
        if let Some(items) = props.items {
            self.load_root(items);
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
