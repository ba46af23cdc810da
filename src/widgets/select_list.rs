//! SelectList widget.

use serde::Deserialize;
use serde_json::Value;

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::key::KeyCode;
use crate::core::message::Message;
use crate::core::text::truncate_to_width;

fn normalize_to_single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_break = false;
    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            if !last_was_break {
                out.push(' ');
            }
            last_was_break = true;
        } else {
            out.push(ch);
            last_was_break = false;
        }
    }
    out.trim().to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SelectItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Opaque host data carried through `item_selected`.
    #[serde(default)]
    pub value: Option<Value>,
    /// Suffix drawn after the title (submenu marker and similar).
    #[serde(skip)]
    pub marker: Option<String>,
}

impl SelectItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            value: None,
            marker: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// JSON form used in notification payloads.
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("title".to_string(), Value::from(self.title.as_str()));
        if let Some(description) = &self.description {
            object.insert("description".to_string(), Value::from(description.as_str()));
        }
        if let Some(value) = &self.value {
            object.insert("value".to_string(), value.clone());
        }
        Value::Object(object)
    }
}

/// Vertical list with a single selected row.
///
/// Up/Down wrap around; Home/End and PageUp/PageDown clamp.
#[derive(Debug, Clone)]
pub struct SelectList {
    items: Vec<SelectItem>,
    selected_index: usize,
    max_visible: usize,
    selected_prefix: String,
    unselected_prefix: String,
    no_items: String,
}

impl SelectList {
    pub fn new(items: Vec<SelectItem>, defaults: &AdapterDefaults) -> Self {
        Self {
            items,
            selected_index: 0,
            max_visible: defaults.max_visible,
            selected_prefix: defaults.selected_prefix.clone(),
            unselected_prefix: defaults.unselected_prefix.clone(),
            no_items: defaults.no_items.clone(),
        }
    }

    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    /// Replace the items and select the first one.
    pub fn set_items(&mut self, items: Vec<SelectItem>) {
        self.items = items;
        self.selected_index = 0;
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.max_visible = max_visible.max(1);
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn set_selected_index(&mut self, index: usize) {
        if self.items.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = index.min(self.items.len() - 1);
        }
    }

    pub fn selected_item(&self) -> Option<&SelectItem> {
        self.items.get(self.selected_index)
    }

    pub fn update(&mut self, message: &Message) -> Command {
        let Some(key) = message.as_key() else {
            return Command::None;
        };
        if self.items.is_empty() || key.ctrl || key.alt {
            return Command::None;
        }
        let last = self.items.len() - 1;
        let page = self.max_visible.max(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = if self.selected_index == 0 {
                    last
                } else {
                    self.selected_index - 1
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_index = if self.selected_index == last {
                    0
                } else {
                    self.selected_index + 1
                };
            }
            KeyCode::Home => self.selected_index = 0,
            KeyCode::End => self.selected_index = last,
            KeyCode::PageUp => self.selected_index = self.selected_index.saturating_sub(page),
            KeyCode::PageDown => self.selected_index = (self.selected_index + page).min(last),
            _ => {}
        }
        Command::None
    }

    fn render_item(&self, width: usize, item: &SelectItem, selected: bool) -> String {
        let prefix = if selected {
            &self.selected_prefix
        } else {
            &self.unselected_prefix
        };
        let prefix_width = crate::core::text::visible_width(prefix);
        let marker = item.marker.as_deref().unwrap_or("");
        let title = format!("{}{marker}", item.title);
        let description = item
            .description
            .as_deref()
            .map(normalize_to_single_line)
            .filter(|description| !description.is_empty());

        if let Some(description) = description {
            if width > 40 {
                let max_value_width = 30.min(width.saturating_sub(prefix_width + 4));
                let truncated_value = truncate_to_width(&title, max_value_width, "");
                let spacing = " ".repeat(1.max(32usize.saturating_sub(truncated_value.len())));

                let description_start = prefix_width + truncated_value.len() + spacing.len();
                let remaining_width = width.saturating_sub(description_start + 2);
                if remaining_width > 10 {
                    let truncated_desc = truncate_to_width(&description, remaining_width, "");
                    return format!("{prefix}{truncated_value}{spacing}{truncated_desc}");
                }
            }
        }

        let max_width = width.saturating_sub(prefix_width + 2);
        let truncated_value = truncate_to_width(&title, max_width, "");
        format!("{prefix}{truncated_value}")
    }

    pub fn render(&self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();

        if self.items.is_empty() {
            lines.push(self.no_items.clone());
            return lines;
        }

        let max_visible = self.max_visible.max(1).min(self.items.len());
        let half = max_visible / 2;
        let start_index = if self.items.len() <= max_visible {
            0
        } else {
            let candidate = self.selected_index.saturating_sub(half);
            let max_start = self.items.len() - max_visible;
            candidate.min(max_start)
        };
        let end_index = (start_index + max_visible).min(self.items.len());

        for (idx, item) in self.items[start_index..end_index].iter().enumerate() {
            let idx = start_index + idx;
            lines.push(self.render_item(width, item, idx == self.selected_index));
        }

        if start_index > 0 || end_index < self.items.len() {
            let scroll_text = format!("  ({}/{})", self.selected_index + 1, self.items.len());
            lines.push(truncate_to_width(&scroll_text, width.saturating_sub(2), ""));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectItem, SelectList};
    use crate::config::AdapterDefaults;
    use crate::core::message::parse_input;

    fn list(titles: &[&str], max_visible: usize) -> SelectList {
        let mut list = SelectList::new(
            titles.iter().map(|title| SelectItem::new(*title)).collect(),
            &AdapterDefaults::default(),
        );
        list.set_max_visible(max_visible);
        list
    }

    fn send(list: &mut SelectList, data: &str) {
        for message in parse_input(data) {
            let _ = list.update(&message);
        }
    }

    fn selected(list: &SelectList) -> &str {
        list.selected_item().map(|item| item.title.as_str()).unwrap_or("")
    }

    #[test]
    fn select_list_navigates_and_wraps() {
        let mut list = list(&["one", "two", "three"], 2);
        assert_eq!(selected(&list), "one");

        send(&mut list, "\x1b[B");
        assert_eq!(selected(&list), "two");

        send(&mut list, "\x1b[B");
        assert_eq!(selected(&list), "three");

        send(&mut list, "\x1b[B");
        assert_eq!(selected(&list), "one");

        send(&mut list, "\x1b[A");
        assert_eq!(selected(&list), "three");
    }

    #[test]
    fn render_windows_around_selection() {
        let mut list = list(&["a", "b", "c", "d", "e"], 3);
        list.set_selected_index(4);
        let lines = list.render(20);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "→ e");
        assert_eq!(lines[3], "  (5/5)");
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let list = list(&[], 3);
        assert_eq!(list.render(20), vec!["  No items".to_string()]);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn marker_is_drawn_after_title() {
        let mut list = SelectList::new(
            vec![SelectItem::new("Settings").with_marker(" ›")],
            &AdapterDefaults::default(),
        );
        list.set_max_visible(5);
        assert_eq!(list.render(30), vec!["→ Settings ›".to_string()]);
    }
}
