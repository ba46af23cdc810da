//! Table adapter.

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
use crate::widgets::{Column, Table};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColumnProp {
    Title(String),
    Column(Column),
}

impl From<ColumnProp> for Column {
    fn from(prop: ColumnProp) -> Self {
        match prop {
            ColumnProp::Title(title) => Column::new(title),
            ColumnProp::Column(column) => column,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableProps {
    #[serde(flatten)]
    common: CommonProps,
    columns: Option<Vec<ColumnProp>>,
    rows: Option<Vec<Vec<Value>>>,
    height: Option<usize>,
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub struct TableComponent {
    base: ComponentBase,
    table: Table,
}

impl TableComponent {
    pub fn new(
        id: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
        defaults: &AdapterDefaults,
    ) -> Self {
        Self {
            base: ComponentBase::new(id),
            table: Table::new(columns, rows, defaults),
        }
    }

    pub fn cursor(&self) -> usize {
        self.table.cursor()
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.table.selected().iter().copied().collect()
    }

    fn row_json(&self) -> Option<Value> {
        self.table.current_row().map(|row| Value::from(row.to_vec()))
    }

    fn select_row(&self) -> Interception {
        let Some(row) = self.row_json() else {
            return swallow();
        };
        Interception::handled(
            NotificationEvent::new(self.base.id(), names::ROW_SELECTED)
                .with("index", self.table.cursor())
                .with("row", row)
                .publish(),
        )
    }
}

impl BindingProvider for TableComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "select" => self.select_row(),
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for TableComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            Some(SpecialKey::Enter) => self.select_row(),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for TableComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.table.update(message)
    }
}

impl Observable for TableComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(
                fields::INDEX,
                FieldValue::Selection {
                    index: self.table.cursor(),
                    item: self.row_json(),
                },
            )
            .with(fields::SELECTED, FieldValue::Json(Value::from(self.selected_rows())))
            .with(fields::OFFSET, FieldValue::Number(self.table.offset() as i64))
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for TableComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for TableComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for TableComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.table.render(width)
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Table
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: TableProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.height == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "height",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if props.columns.is_some() || props.rows.is_some() {
            let columns = match props.columns {
                Some(columns) => columns.into_iter().map(Column::from).collect(),
                None => self.table.columns().to_vec(),
            };
            let rows = match props.rows {
                Some(rows) => rows
                    .into_iter()
                    .map(|row| row.into_iter().map(cell_text).collect())
                    .collect(),
                None => self.table.rows().to_vec(),
            };
            self.table.set_data(columns, rows);
        }
        if let Some(height) = props.height {
            self.table.set_height(height);
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
    use super::TableComponent;
    use crate::config::AdapterDefaults;
    use crate::core::component::Component;
    use crate::core::event_bus::names;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::Message;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> TableComponent {
        let mut table = TableComponent::new("procs", Vec::new(), Vec::new(), &AdapterDefaults::default());
        table
            .apply_config(&json!({
                "focused": true,
                "height": 2,
                "columns": ["pid", { "title": "name", "width": 8 }],
                "rows": [[1, "init"], [42, "shell"], [77, null]],
            }))
            .expect("config applies");
        table
    }

    fn press(table: &mut TableComponent, code: KeyCode) -> crate::core::bubble::UpdateResult {
        table.update(Message::Key(KeyEvent::new(code)))
    }

    #[test]
    fn enter_emits_row_selected() {
        let mut table = table();
        let _ = press(&mut table, KeyCode::Down);
        let result = press(&mut table, KeyCode::Enter);
        let events = result.command.notifications();
        assert_eq!(events[0].name, names::ROW_SELECTED);
        assert_eq!(events[0].get("row"), Some(&json!(["42", "shell"])));
    }

    #[test]
    fn space_toggle_is_diffed_as_selected() {
        let mut table = table();
        let result = press(&mut table, KeyCode::Space);
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::SELECTED_CHANGED);
        assert_eq!(events[0].get("new"), Some(&json!([0])));
        assert_eq!(table.selected_rows(), vec![0]);
    }

    #[test]
    fn scrolling_past_window_emits_selection_then_scroll() {
        let mut table = table();
        let _ = press(&mut table, KeyCode::Down);
        let result = press(&mut table, KeyCode::Down);
        let seen: Vec<String> = result
            .command
            .notifications()
            .iter()
            .map(|event| event.name.clone())
            .collect();
        assert_eq!(seen, vec![names::SELECTION_CHANGED, names::SCROLLED]);
        assert_eq!(table.cursor(), 2);
    }
}
