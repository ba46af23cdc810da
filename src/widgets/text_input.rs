//! Single-line text input widget.

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::message::Message;
use crate::core::text::{grapheme_segments, visible_width};

const PUNCTUATION: &str = "(){}[]<>.,;:'\"!?+-=*/\\|&%^$#@~`";

fn is_whitespace_segment(segment: &str) -> bool {
    segment.chars().any(char::is_whitespace)
}

fn is_punctuation_segment(segment: &str) -> bool {
    segment.chars().any(|ch| PUNCTUATION.contains(ch))
}

/// Single-line input with horizontal scrolling.
///
/// `cursor` is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
    prompt: String,
    placeholder: String,
    cursor_on: String,
    cursor_off: String,
}

impl TextInput {
    pub fn new(defaults: &AdapterDefaults) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            prompt: defaults.prompt.clone(),
            placeholder: String::new(),
            cursor_on: defaults.cursor_on.clone(),
            cursor_off: defaults.cursor_off.clone(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the value and move the cursor to its end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into().replace(['\r', '\n'], "");
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn update(&mut self, message: &Message) -> Command {
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::Paste(text) => self.insert_text(&text.replace(['\r', '\n'], "")),
            _ => {}
        }
        Command::None
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if let Some(ch) = key.text() {
            let mut buf = [0u8; 4];
            self.insert_text(ch.encode_utf8(&mut buf));
            return;
        }

        match (key.code, key.ctrl, key.alt) {
            (KeyCode::Backspace, false, true) | (KeyCode::Char('w'), true, false) => {
                self.delete_word_backwards();
            }
            (KeyCode::Backspace, _, _) | (KeyCode::Char('h'), true, false) => {
                self.delete_grapheme_backwards();
            }
            (KeyCode::Delete, _, _) | (KeyCode::Char('d'), true, false) => {
                self.delete_grapheme_forwards();
            }
            (KeyCode::Char('u'), true, false) => {
                self.value.replace_range(..self.cursor, "");
                self.cursor = 0;
            }
            (KeyCode::Char('k'), true, false) => self.value.truncate(self.cursor),
            (KeyCode::Left, true, _) | (KeyCode::Left, _, true) | (KeyCode::Char('b'), false, true) => {
                self.move_word_backwards();
            }
            (KeyCode::Right, true, _) | (KeyCode::Right, _, true) | (KeyCode::Char('f'), false, true) => {
                self.move_word_forwards();
            }
            (KeyCode::Left, _, _) | (KeyCode::Char('b'), true, false) => {
                self.cursor = self.prev_boundary();
            }
            (KeyCode::Right, _, _) | (KeyCode::Char('f'), true, false) => {
                self.cursor = self.next_boundary();
            }
            (KeyCode::Home, _, _) | (KeyCode::Char('a'), true, false) => self.cursor = 0,
            (KeyCode::End, _, _) | (KeyCode::Char('e'), true, false) => {
                self.cursor = self.value.len();
            }
            _ => {}
        }
    }

    fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.value.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        grapheme_segments(&self.value[..self.cursor])
            .next_back()
            .map(|segment| self.cursor - segment.len())
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        grapheme_segments(&self.value[self.cursor..])
            .next()
            .map(|segment| self.cursor + segment.len())
            .unwrap_or(self.value.len())
    }

    fn delete_grapheme_backwards(&mut self) {
        let start = self.prev_boundary();
        self.value.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    fn delete_grapheme_forwards(&mut self) {
        let end = self.next_boundary();
        self.value.replace_range(self.cursor..end, "");
    }

    fn delete_word_backwards(&mut self) {
        let end = self.cursor;
        self.move_word_backwards();
        self.value.replace_range(self.cursor..end, "");
    }

    fn move_word_backwards(&mut self) {
        let mut graphemes: Vec<&str> = grapheme_segments(&self.value[..self.cursor]).collect();
        let mut cursor = self.cursor;

        while let Some(last) = graphemes.last() {
            if !is_whitespace_segment(last) {
                break;
            }
            cursor -= last.len();
            graphemes.pop();
        }

        let punctuation_run = graphemes.last().is_some_and(|last| is_punctuation_segment(last));
        while let Some(last) = graphemes.last() {
            let same_class = if punctuation_run {
                is_punctuation_segment(last)
            } else {
                !is_whitespace_segment(last) && !is_punctuation_segment(last)
            };
            if !same_class {
                break;
            }
            cursor -= last.len();
            graphemes.pop();
        }
        self.cursor = cursor;
    }

    fn move_word_forwards(&mut self) {
        let mut iter = grapheme_segments(&self.value[self.cursor..]).peekable();
        let mut cursor = self.cursor;

        while let Some(segment) = iter.peek() {
            if !is_whitespace_segment(segment) {
                break;
            }
            cursor += segment.len();
            iter.next();
        }

        let punctuation_run = iter.peek().is_some_and(|segment| is_punctuation_segment(segment));
        while let Some(segment) = iter.peek() {
            let same_class = if punctuation_run {
                is_punctuation_segment(segment)
            } else {
                !is_whitespace_segment(segment) && !is_punctuation_segment(segment)
            };
            if !same_class {
                break;
            }
            cursor += segment.len();
            iter.next();
        }
        self.cursor = cursor;
    }

    /// One line: prompt, the visible window of the value, and the cursor cell
    /// when focused.
    pub fn render(&self, width: usize, focused: bool) -> Vec<String> {
        let prompt = &self.prompt;
        let available_width = width.saturating_sub(visible_width(prompt));
        if available_width == 0 {
            return vec![prompt.to_string()];
        }

        if self.value.is_empty() && !focused && !self.placeholder.is_empty() {
            let placeholder = crate::core::text::truncate_to_width(&self.placeholder, available_width, "");
            return vec![format!("{prompt}{placeholder}")];
        }

        let (start, end) = self.visible_window(available_width);
        let visible_text = &self.value[start..end];
        let cursor = self.cursor.clamp(start, end) - start;

        let line = if focused {
            let before_cursor = &visible_text[..cursor];
            let after_slice = &visible_text[cursor..];
            let (at_cursor, after_cursor) = match grapheme_segments(after_slice).next() {
                Some(grapheme) => (grapheme, &after_slice[grapheme.len()..]),
                None => (" ", ""),
            };
            format!(
                "{before_cursor}{}{at_cursor}{}{after_cursor}",
                self.cursor_on, self.cursor_off
            )
        } else {
            visible_text.to_string()
        };

        let padding = " ".repeat(available_width.saturating_sub(visible_width(&line)));
        vec![format!("{prompt}{line}{padding}")]
    }

    /// Byte range of the value shown in `available_width` columns, keeping
    /// the cursor roughly centered once the value overflows.
    fn visible_window(&self, available_width: usize) -> (usize, usize) {
        if visible_width(&self.value) < available_width {
            return (0, self.value.len());
        }
        let scroll_width = if self.cursor == self.value.len() {
            available_width.saturating_sub(1)
        } else {
            available_width
        };
        let half = scroll_width / 2;

        let mut start = self.cursor;
        let mut left = 0;
        for grapheme in grapheme_segments(&self.value[..self.cursor]).rev() {
            if left + visible_width(grapheme) > half {
                break;
            }
            left += visible_width(grapheme);
            start -= grapheme.len();
        }

        let mut end = start;
        let mut used = 0;
        for grapheme in grapheme_segments(&self.value[start..]) {
            if used + visible_width(grapheme) > scroll_width {
                break;
            }
            used += visible_width(grapheme);
            end += grapheme.len();
        }

        // Near the end of the value, pull the window left to fill the line.
        if end == self.value.len() {
            for grapheme in grapheme_segments(&self.value[..start]).rev() {
                if used + visible_width(grapheme) > scroll_width {
                    break;
                }
                used += visible_width(grapheme);
                start -= grapheme.len();
            }
        }
        (start, end)
    }
}
