//! Observable state snapshots and the diff that turns them into notifications.

use serde_json::Value;

use crate::core::event_bus::{names, NotificationEvent};

/// Well-known snapshot field names.
pub mod fields {
    pub const VALUE: &str = "value";
    pub const FOCUSED: &str = "focused";
    pub const INDEX: &str = "index";
    pub const SELECTED: &str = "selected";
    pub const OFFSET: &str = "offset";
}

/// One observable field value.
///
/// Equality is structural, except for [`FieldValue::Opaque`], which never
/// compares equal: a value that cannot be compared is reported as changed.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(i64),
    Selection { index: usize, item: Option<Value> },
    Json(Value),
    Opaque(Value),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (
                FieldValue::Selection { index: a, item: item_a },
                FieldValue::Selection { index: b, item: item_b },
            ) => a == b && item_a == item_b,
            (FieldValue::Json(a), FieldValue::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::from(text.as_str()),
            FieldValue::Bool(flag) => Value::from(*flag),
            FieldValue::Number(number) => Value::from(*number),
            FieldValue::Selection { index, .. } => Value::from(*index),
            FieldValue::Json(value) | FieldValue::Opaque(value) => value.clone(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// Ordered field name → value mapping captured around one delegation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservableState {
    fields: Vec<(&'static str, FieldValue)>,
}

impl ObservableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace `name`, keeping first-insertion order.
    pub fn with(mut self, name: &'static str, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One field that differs between two snapshots.
///
/// `old`/`new` are `None` when the field exists on one side only.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
}

impl FieldChange {
    /// The single notification this change maps to.
    pub fn to_notification(&self, source_id: &str) -> NotificationEvent {
        let old = self.old.as_ref().map(FieldValue::to_json).unwrap_or(Value::Null);
        let new = self.new.as_ref().map(FieldValue::to_json).unwrap_or(Value::Null);
        match self.field {
            fields::VALUE => NotificationEvent::new(source_id, names::VALUE_CHANGED)
                .with("old", old)
                .with("new", new),
            fields::FOCUSED => NotificationEvent::new(source_id, names::FOCUS_CHANGED)
                .with("focused", new),
            fields::INDEX => {
                let item = match &self.new {
                    Some(FieldValue::Selection { item: Some(item), .. }) => item.clone(),
                    _ => Value::Null,
                };
                NotificationEvent::new(source_id, names::SELECTION_CHANGED)
                    .with("old_index", old)
                    .with("new_index", new)
                    .with("item", item)
            }
            fields::SELECTED => NotificationEvent::new(source_id, names::SELECTED_CHANGED)
                .with("old", old)
                .with("new", new),
            fields::OFFSET => NotificationEvent::new(source_id, names::SCROLLED)
                .with("old", old)
                .with("new", new),
            other => NotificationEvent::new(source_id, format!("{other}_changed"))
                .with("old", old)
                .with("new", new),
        }
    }
}

/// Fields that differ, in `new`'s order followed by fields only in `old`.
pub fn diff(old: &ObservableState, new: &ObservableState) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    for (name, value) in new.iter() {
        let previous = old.get(name);
        if previous != Some(value) {
            changes.push(FieldChange {
                field: name,
                old: previous.cloned(),
                new: Some(value.clone()),
            });
        }
    }
    for (name, value) in old.iter() {
        if new.get(name).is_none() {
            changes.push(FieldChange {
                field: name,
                old: Some(value.clone()),
                new: None,
            });
        }
    }
    changes
}
