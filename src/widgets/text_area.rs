//! Multi-line text area widget.

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::message::Message;
use crate::core::text::{grapheme_segments, pad_to_width, truncate_to_width, visible_width};

/// Line-oriented editor. `row`/`col` address `lines[row]` at byte `col`.
#[derive(Debug, Clone)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
    height: usize,
    scroll: usize,
    cursor_on: String,
    cursor_off: String,
}

impl TextArea {
    pub fn new(defaults: &AdapterDefaults) -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            height: defaults.max_visible,
            scroll: 0,
            cursor_on: defaults.cursor_on.clone(),
            cursor_off: defaults.cursor_off.clone(),
        }
    }

    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn set_value(&mut self, value: &str) {
        self.lines = normalize_newlines(value).split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = self.lines[self.row].len();
        self.keep_cursor_visible();
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.keep_cursor_visible();
    }

    pub fn update(&mut self, message: &Message) -> Command {
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::Paste(text) => self.insert_text(&normalize_newlines(text)),
            _ => {}
        }
        self.keep_cursor_visible();
        Command::None
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(ch) = key.text() {
            let mut buf = [0u8; 4];
            self.insert_text(ch.encode_utf8(&mut buf));
            return;
        }

        match (key.code, key.ctrl) {
            (KeyCode::Enter, _) | (KeyCode::Char('j'), true) => self.insert_text("\n"),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete_forward(),
            (KeyCode::Left, _) => self.move_left(),
            (KeyCode::Right, _) => self.move_right(),
            (KeyCode::Up, _) => self.move_vertical(-1),
            (KeyCode::Down, _) => self.move_vertical(1),
            (KeyCode::PageUp, _) => self.move_vertical(-(self.height as isize)),
            (KeyCode::PageDown, _) => self.move_vertical(self.height as isize),
            (KeyCode::Home, _) | (KeyCode::Char('a'), true) => self.col = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), true) => self.col = self.lines[self.row].len(),
            (KeyCode::Char('k'), true) => self.lines[self.row].truncate(self.col),
            (KeyCode::Char('u'), true) => {
                self.lines[self.row].replace_range(..self.col, "");
                self.col = 0;
            }
            _ => {}
        }
    }

    fn insert_text(&mut self, text: &str) {
        let mut parts = text.split('\n');
        let Some(first) = parts.next() else {
            return;
        };
        let tail = self.lines[self.row].split_off(self.col);
        self.lines[self.row].push_str(first);
        self.col += first.len();
        for part in parts {
            self.row += 1;
            self.lines.insert(self.row, part.to_string());
            self.col = part.len();
        }
        self.lines[self.row].push_str(&tail);
    }

    fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let len = grapheme_segments(&line[..self.col])
                .next_back()
                .map_or(0, str::len);
            line.replace_range(self.col - len..self.col, "");
            self.col -= len;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].len();
            self.lines[self.row].push_str(&line);
        }
    }

    fn delete_forward(&mut self) {
        let line_len = self.lines[self.row].len();
        if self.col < line_len {
            let line = &mut self.lines[self.row];
            let len = grapheme_segments(&line[self.col..]).next().map_or(0, str::len);
            line.replace_range(self.col..self.col + len, "");
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            let len = grapheme_segments(&self.lines[self.row][..self.col])
                .next_back()
                .map_or(0, str::len);
            self.col -= len;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].len();
        }
    }

    fn move_right(&mut self) {
        let line = &self.lines[self.row];
        if self.col < line.len() {
            self.col += grapheme_segments(&line[self.col..]).next().map_or(0, str::len);
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    /// Move by `delta` rows, keeping the display column where possible.
    fn move_vertical(&mut self, delta: isize) {
        let column = visible_width(&self.lines[self.row][..self.col]);
        let last = self.lines.len() - 1;
        self.row = self.row.saturating_add_signed(delta).min(last);

        let line = &self.lines[self.row];
        let mut col = 0;
        let mut width = 0;
        for grapheme in grapheme_segments(line) {
            let next = width + visible_width(grapheme);
            if next > column {
                break;
            }
            width = next;
            col += grapheme.len();
        }
        self.col = col;
    }

    fn keep_cursor_visible(&mut self) {
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + self.height {
            self.scroll = self.row + 1 - self.height;
        }
    }

    pub fn render(&self, width: usize, focused: bool) -> Vec<String> {
        let end = (self.scroll + self.height).min(self.lines.len());
        (self.scroll..end)
            .map(|row| {
                let line = &self.lines[row];
                let text = if focused && row == self.row {
                    let (before, after) = line.split_at(self.col);
                    let (at, rest) = match grapheme_segments(after).next() {
                        Some(grapheme) => (grapheme, &after[grapheme.len()..]),
                        None => (" ", ""),
                    };
                    format!("{before}{}{at}{}{rest}", self.cursor_on, self.cursor_off)
                } else {
                    line.clone()
                };
                pad_to_width(&truncate_to_width(&text, width, ""), width)
            })
            .collect()
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::TextArea;
    use crate::config::AdapterDefaults;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::Message;

    fn area() -> TextArea {
        TextArea::new(&AdapterDefaults::default())
    }

    fn typed(area: &mut TextArea, text: &str) {
        for ch in text.chars() {
            let _ = area.update(&Message::Key(KeyEvent::char(ch)));
        }
    }

    fn key(area: &mut TextArea, code: KeyCode) {
        let _ = area.update(&Message::Key(KeyEvent::new(code)));
    }

    #[test]
    fn enter_splits_lines_and_backspace_joins_them() {
        let mut area = area();
        typed(&mut area, "ab");
        key(&mut area, KeyCode::Left);
        key(&mut area, KeyCode::Enter);
        assert_eq!(area.value(), "a\nb");
        assert_eq!(area.cursor(), (1, 0));

        key(&mut area, KeyCode::Backspace);
        assert_eq!(area.value(), "ab");
        assert_eq!(area.cursor(), (0, 1));
    }

    #[test]
    fn vertical_motion_keeps_column() {
        let mut area = area();
        area.set_value("hello\nhi\nworld");
        key(&mut area, KeyCode::Up);
        assert_eq!(area.cursor(), (1, 2));
        key(&mut area, KeyCode::Up);
        assert_eq!(area.cursor(), (0, 2));
        key(&mut area, KeyCode::Down);
        key(&mut area, KeyCode::Down);
        key(&mut area, KeyCode::Down);
        assert_eq!(area.cursor(), (2, 2));
    }

    #[test]
    fn paste_keeps_newlines() {
        let mut area = area();
        let _ = area.update(&Message::Paste("one\r\ntwo".to_string()));
        assert_eq!(area.value(), "one\ntwo");
        assert_eq!(area.line_count(), 2);
    }

    #[test]
    fn render_scrolls_to_cursor() {
        let mut area = area();
        area.set_height(2);
        area.set_value("1\n2\n3\n4");
        let lines = area.render(4, false);
        assert_eq!(lines, vec!["3   ".to_string(), "4   ".to_string()]);
    }
}
