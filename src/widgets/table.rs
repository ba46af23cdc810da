//! Table widget: fixed columns, a cursor row and a multi-selection set.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::key::KeyCode;
use crate::core::message::Message;
use crate::core::text::{pad_to_width, truncate_to_width, visible_width};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    pub title: String,
    /// Fixed width in columns; `None` sizes to the widest cell.
    #[serde(default)]
    pub width: Option<usize>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    cursor: usize,
    offset: usize,
    height: usize,
    selected: BTreeSet<usize>,
    selected_prefix: String,
    unselected_prefix: String,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<String>>, defaults: &AdapterDefaults) -> Self {
        Self {
            columns,
            rows,
            cursor: 0,
            offset: 0,
            height: defaults.max_visible.max(1),
            selected: BTreeSet::new(),
            selected_prefix: defaults.selected_prefix.clone(),
            unselected_prefix: defaults.unselected_prefix.clone(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Replace the data. Cursor and selection are reset.
    pub fn set_data(&mut self, columns: Vec<Column>, rows: Vec<Vec<String>>) {
        self.columns = columns;
        self.rows = rows;
        self.cursor = 0;
        self.offset = 0;
        self.selected.clear();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.keep_cursor_visible();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn current_row(&self) -> Option<&[String]> {
        self.rows.get(self.cursor).map(Vec::as_slice)
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn toggle_current(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    pub fn update(&mut self, message: &Message) -> Command {
        let Some(key) = message.as_key() else {
            return Command::None;
        };
        if self.rows.is_empty() || key.ctrl || key.alt {
            return Command::None;
        }
        let last = self.rows.len() - 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(last),
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(self.height),
            KeyCode::PageDown => self.cursor = (self.cursor + self.height).min(last),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = last,
            KeyCode::Space => self.toggle_current(),
            _ => {}
        }
        self.keep_cursor_visible();
        Command::None
    }

    fn keep_cursor_visible(&mut self) {
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
    }

    fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                column.width.unwrap_or_else(|| {
                    self.rows
                        .iter()
                        .filter_map(|row| row.get(idx))
                        .map(|cell| visible_width(cell))
                        .chain(std::iter::once(visible_width(&column.title)))
                        .max()
                        .unwrap_or(0)
                })
            })
            .collect()
    }

    fn format_row<'a>(&self, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
        cells
            .zip(widths)
            .map(|(cell, width)| pad_to_width(&truncate_to_width(cell, *width, ""), *width))
            .collect::<Vec<_>>()
            .join(" │ ")
    }

    /// Header, separator and the visible window of rows.
    pub fn render(&self, width: usize) -> Vec<String> {
        let widths = self.column_widths();
        let prefix_width = visible_width(&self.unselected_prefix);
        let header = self.format_row(self.columns.iter().map(|c| c.title.as_str()), &widths);
        let rule_width = visible_width(&header).min(width.saturating_sub(prefix_width));

        let mut lines = vec![
            truncate_to_width(&format!("{}{header}", " ".repeat(prefix_width)), width, ""),
            format!("{}{}", " ".repeat(prefix_width), "─".repeat(rule_width)),
        ];

        let end = (self.offset + self.height).min(self.rows.len());
        for idx in self.offset..end {
            let row = &self.rows[idx];
            let prefix = if idx == self.cursor {
                &self.selected_prefix
            } else {
                &self.unselected_prefix
            };
            let mark = if self.selected.contains(&idx) { "* " } else { "" };
            let cells = row.iter().map(String::as_str);
            let body = self.format_row(cells, &widths);
            lines.push(truncate_to_width(&format!("{prefix}{mark}{body}"), width, ""));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Table};
    use crate::config::AdapterDefaults;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::Message;

    fn table() -> Table {
        let rows = (1..=5)
            .map(|n| vec![format!("row{n}"), format!("{}", n * 10)])
            .collect();
        let mut table = Table::new(
            vec![Column::new("name"), Column::new("size")],
            rows,
            &AdapterDefaults::default(),
        );
        table.set_height(2);
        table
    }

    fn press(table: &mut Table, code: KeyCode) {
        let _ = table.update(&Message::Key(KeyEvent::new(code)));
    }

    #[test]
    fn cursor_clamps_and_scrolls() {
        let mut table = table();
        press(&mut table, KeyCode::Up);
        assert_eq!(table.cursor(), 0);
        press(&mut table, KeyCode::Down);
        press(&mut table, KeyCode::Down);
        assert_eq!(table.cursor(), 2);
        assert_eq!(table.offset(), 1);
        press(&mut table, KeyCode::End);
        assert_eq!(table.cursor(), 4);
        assert_eq!(table.offset(), 3);
    }

    #[test]
    fn space_toggles_selection() {
        let mut table = table();
        press(&mut table, KeyCode::Space);
        press(&mut table, KeyCode::Down);
        press(&mut table, KeyCode::Space);
        assert_eq!(table.selected().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        press(&mut table, KeyCode::Space);
        assert_eq!(table.selected().iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn render_has_header_rule_and_window() {
        let table = table();
        let lines = table.render(40);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "  name │ size");
        assert!(lines[2].starts_with("→ row1"));
    }
}
