//! Selectable list adapter.

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

/// An item written either as a bare title or as a full object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemProp {
    Title(String),
    Item(SelectItem),
}

impl From<ItemProp> for SelectItem {
    fn from(prop: ItemProp) -> Self {
        match prop {
            ItemProp::Title(title) => SelectItem::new(title),
            ItemProp::Item(item) => item,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListProps {
    #[serde(flatten)]
    common: CommonProps,
    items: Option<Vec<ItemProp>>,
    selected: Option<usize>,
    max_visible: Option<usize>,
}

pub struct ListComponent {
    base: ComponentBase,
    list: SelectList,
}

impl ListComponent {
    pub fn new(id: impl Into<String>, items: Vec<SelectItem>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            list: SelectList::new(items, defaults),
        }
    }

    fn requested_index(payload: &Value) -> Option<usize> {
        payload
            .get("index")
            .and_then(Value::as_u64)
            .map(|index| index as usize)
    }

    pub fn selected_index(&self) -> usize {
        self.list.selected_index()
    }

    pub fn selected_item(&self) -> Option<&SelectItem> {
        self.list.selected_item()
    }

    fn select_current(&self) -> Interception {
        let Some(item) = self.list.selected_item() else {
            return swallow();
        };
        Interception::handled(
            NotificationEvent::new(self.base.id(), names::ITEM_SELECTED)
                .with("index", self.list.selected_index())
                .with("item", item.to_json())
                .publish(),
        )
    }
}

impl BindingProvider for ListComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "select" => self.select_current(),
            // Applied in `delegate` so the move is diffed and published.
            "select_index" if Self::requested_index(payload).is_some() => Interception::pass(),
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for ListComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            Some(SpecialKey::Enter) => self.select_current(),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for ListComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        match message {
            Message::Action(action) if action.action == "select_index" => {
                if let Some(index) = Self::requested_index(&action.payload) {
                    self.list.set_selected_index(index);
                }
                Command::None
            }
            _ => self.list.update(message),
        }
    }
}

impl Observable for ListComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(
                fields::INDEX,
                FieldValue::Selection {
                    index: self.list.selected_index(),
                    item: self.list.selected_item().map(SelectItem::to_json),
                },
            )
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for ListComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for ListComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for ListComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.list.render(width)
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::List
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: ListProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.max_visible == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "max_visible",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if let Some(items) = props.items {
            self.list.set_items(items.into_iter().map(SelectItem::from).collect());
        }
        if let Some(max_visible) = props.max_visible {
            self.list.set_max_visible(max_visible);
        }
        if let Some(selected) = props.selected {
            self.list.set_selected_index(selected);
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
