//! Tick-driven spinner.
//!
//! The spinner never sleeps or spawns: each accepted tick returns the next
//! [`Command::Tick`]. Restarting or stopping bumps `tag`, so ticks already in
//! flight are recognized as stale and dropped.

use std::time::Duration;

use crate::config::AdapterDefaults;
use crate::core::command::Command;
use crate::core::message::{Message, TickMessage};

#[derive(Debug, Clone)]
pub struct Spinner {
    id: String,
    frames: Vec<String>,
    interval: Duration,
    frame: usize,
    tag: u64,
    running: bool,
    message: String,
}

impl Spinner {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            id: id.into(),
            frames: defaults.spinner_frames.clone(),
            interval: defaults.spinner_interval,
            frame: 0,
            tag: 0,
            running: false,
            message: String::new(),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_frames(&mut self, frames: Vec<String>) {
        if !frames.is_empty() {
            self.frames = frames;
            self.frame = 0;
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Start (or restart) the animation and return the first tick.
    pub fn start(&mut self) -> Command {
        self.tag = self.tag.wrapping_add(1);
        self.frame = 0;
        self.running = true;
        self.schedule()
    }

    pub fn stop(&mut self) {
        self.tag = self.tag.wrapping_add(1);
        self.running = false;
    }

    fn schedule(&self) -> Command {
        Command::Tick {
            tick: TickMessage {
                id: self.id.clone(),
                tag: self.tag,
            },
            after: self.interval,
        }
    }

    pub fn update(&mut self, message: &Message) -> Command {
        let Message::Tick(tick) = message else {
            return Command::None;
        };
        if !self.running || tick.id != self.id || tick.tag != self.tag {
            return Command::None;
        }
        self.frame = (self.frame + 1) % self.frames.len().max(1);
        self.schedule()
    }

    pub fn render(&self, width: usize) -> Vec<String> {
        let glyph = if self.running {
            self.frames.get(self.frame).map(String::as_str).unwrap_or("")
        } else {
            " "
        };
        let line = if self.message.is_empty() {
            glyph.to_string()
        } else {
            format!("{glyph} {}", self.message)
        };
        vec![crate::core::text::truncate_to_width(&line, width, "")]
    }
}
