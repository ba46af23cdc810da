//! Scrollable read-only viewport.

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::key::KeyCode;
use crate::core::message::Message;
use crate::core::text::{pad_to_width, truncate_to_width, wrap_words};

#[derive(Debug, Clone)]
pub struct Viewport {
    content: String,
    lines: Vec<String>,
    wrap_width: usize,
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(defaults: &AdapterDefaults) -> Self {
        Self {
            content: String::new(),
            lines: Vec::new(),
            wrap_width: 0,
            offset: 0,
            height: defaults.max_visible.max(1),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.relayout();
    }

    /// Wrap width for content layout; `0` keeps source lines as-is.
    pub fn set_wrap_width(&mut self, width: usize) {
        if self.wrap_width != width {
            self.wrap_width = width;
            self.relayout();
        }
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.clamp();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    fn relayout(&mut self) {
        self.lines = if self.wrap_width == 0 {
            self.content.split('\n').map(str::to_string).collect()
        } else {
            wrap_words(&self.content, self.wrap_width)
        };
        if self.content.is_empty() {
            self.lines.clear();
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn update(&mut self, message: &Message) -> Command {
        let Some(key) = message.as_key() else {
            return Command::None;
        };
        if key.ctrl || key.alt {
            return Command::None;
        }
        let half = (self.height / 2).max(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.offset += 1,
            KeyCode::PageUp | KeyCode::Char('b') => {
                self.offset = self.offset.saturating_sub(self.height)
            }
            KeyCode::PageDown | KeyCode::Space | KeyCode::Char('f') => self.offset += self.height,
            KeyCode::Char('u') => self.offset = self.offset.saturating_sub(half),
            KeyCode::Char('d') => self.offset += half,
            KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.offset = self.max_offset(),
            _ => {}
        }
        self.clamp();
        Command::None
    }

    pub fn render(&self, width: usize) -> Vec<String> {
        let end = (self.offset + self.height).min(self.lines.len());
        self.lines[self.offset..end]
            .iter()
            .map(|line| pad_to_width(&truncate_to_width(line, width, ""), width))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Viewport;
    use crate::config::AdapterDefaults;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::Message;

    fn viewport(lines: usize, height: usize) -> Viewport {
        let mut viewport = Viewport::new(&AdapterDefaults::default());
        viewport.set_height(height);
        let content: Vec<String> = (0..lines).map(|n| format!("line {n}")).collect();
        viewport.set_content(content.join("\n"));
        viewport
    }

    fn press(viewport: &mut Viewport, code: KeyCode) {
        let _ = viewport.update(&Message::Key(KeyEvent::new(code)));
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut viewport = viewport(10, 4);
        press(&mut viewport, KeyCode::Up);
        assert_eq!(viewport.offset(), 0);
        press(&mut viewport, KeyCode::PageDown);
        assert_eq!(viewport.offset(), 4);
        press(&mut viewport, KeyCode::PageDown);
        assert_eq!(viewport.offset(), 6);
        assert!(viewport.at_bottom());
        press(&mut viewport, KeyCode::Home);
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn content_shorter_than_height_never_scrolls() {
        let mut viewport = viewport(2, 4);
        press(&mut viewport, KeyCode::Down);
        assert_eq!(viewport.offset(), 0);
        assert_eq!(viewport.render(8), vec!["line 0  ".to_string(), "line 1  ".to_string()]);
    }

    #[test]
    fn wrap_width_relayouts_content() {
        let mut viewport = Viewport::new(&AdapterDefaults::default());
        viewport.set_content("alpha beta gamma");
        assert_eq!(viewport.line_count(), 1);
        viewport.set_wrap_width(10);
        assert_eq!(viewport.line_count(), 2);
    }
}
