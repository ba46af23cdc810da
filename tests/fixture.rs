#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tui_adapters::core::event_bus::drain_notifications;
use tui_adapters::{Command, KeyCode, KeyEvent, Message, NotificationEvent};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read fixture {name}: {err}"))
}

/// Non-comment, non-blank rows of a tab-separated fixture with their 1-based
/// line numbers.
pub fn tsv_rows(name: &str) -> Vec<(usize, Vec<String>)> {
    read_fixture(name)
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            Some((idx + 1, line.split('\t').map(str::to_string).collect()))
        })
        .collect()
}

pub fn unescape(input: &str) -> String {
    let mut out = String::new();
    let mut iter = input.chars().peekable();

    while let Some(ch) = iter.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match iter.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let hex: String = [iter.next(), iter.next()].into_iter().flatten().collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => out.push(byte as char),
                    _ => {
                        out.push_str("\\x");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

pub fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code))
}

pub fn typed(text: &str) -> Vec<Message> {
    text.chars().map(|ch| Message::Key(KeyEvent::char(ch))).collect()
}

pub fn events(command: Command) -> Vec<NotificationEvent> {
    drain_notifications(command).0
}

pub fn event_names(command: &Command) -> Vec<String> {
    command
        .notifications()
        .into_iter()
        .map(|event| event.name.clone())
        .collect()
}
