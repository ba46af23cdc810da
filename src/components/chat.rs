//! Chat adapter: a scrollable transcript above a single-line composer.
//!
//! Enter sends the composer contents as a user message. Up/Down and
//! PageUp/PageDown scroll the transcript; every other key edits the composer.
//! Assistant replies arrive through the `append` action.

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
use crate::core::key::{KeyCode, KeyEvent};
use crate::core::message::Message;
use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
use crate::core::special_keys::{escape_blur, swallow, tab_bubbles, SpecialKey};
use crate::error::ConfigError;
use crate::logging::DISPATCH_TARGET;
use crate::widgets::markdown::{render_markdown, render_plain};
use crate::widgets::{TextInput, Viewport};

/// Layout width used until the first render reports the real one.
const DEFAULT_LAYOUT_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatProps {
    #[serde(flatten)]
    common: CommonProps,
    messages: Option<Vec<ChatMessage>>,
    value: Option<String>,
    placeholder: Option<String>,
    prompt: Option<String>,
    height: Option<usize>,
}

pub struct ChatComponent {
    base: ComponentBase,
    composer: TextInput,
    transcript: Viewport,
    messages: Vec<ChatMessage>,
    user_label: String,
    assistant_label: String,
    /// Width the transcript was last laid out for; `None` forces a relayout.
    layout_width: Option<usize>,
    last_width: usize,
}

impl ChatComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            composer: TextInput::new(defaults),
            transcript: Viewport::new(defaults),
            messages: Vec::new(),
            user_label: defaults.user_label.clone(),
            assistant_label: defaults.assistant_label.clone(),
            layout_width: None,
            last_width: DEFAULT_LAYOUT_WIDTH,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn value(&self) -> &str {
        self.composer.value()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.composer.set_value(value);
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.refresh();
    }

    /// Lay the transcript out again at the last known width.
    fn refresh(&mut self) {
        self.layout_width = None;
        self.layout(self.last_width);
    }

    fn send(&mut self) -> Interception {
        let value = self.composer.value().to_string();
        if value.is_empty() {
            return swallow();
        }
        self.composer.clear();
        self.push_message(ChatMessage::new(ChatRole::User, value.clone()));
        Interception::handled(
            NotificationEvent::new(self.base.id(), names::MESSAGE_SENT)
                .with("value", value)
                .with("index", self.messages.len() - 1)
                .publish(),
        )
    }

    fn label(&self, role: ChatRole) -> &str {
        match role {
            ChatRole::User => &self.user_label,
            ChatRole::Assistant => &self.assistant_label,
            ChatRole::System => "",
        }
    }

    fn layout(&mut self, width: usize) {
        if self.layout_width == Some(width) {
            return;
        }
        let follow = self.transcript.at_bottom();
        let body_width = width.saturating_sub(2).max(1);
        let mut lines = Vec::new();
        for (idx, message) in self.messages.iter().enumerate() {
            if idx > 0 {
                lines.push(String::new());
            }
            let label = self.label(message.role);
            if !label.is_empty() {
                lines.push(format!("{label}:"));
            }
            let body = render_markdown(&message.content, body_width).unwrap_or_else(|err| {
                tracing::debug!(
                    target: DISPATCH_TARGET,
                    chat = self.base.id(),
                    role = message.role.as_str(),
                    error = %err,
                    "markdown parse failed; showing raw text"
                );
                render_plain(&message.content, body_width)
            });
            lines.extend(body.into_iter().map(|line| format!("  {line}")));
        }
        self.last_width = width;
        self.transcript.set_wrap_width(0);
        self.transcript.set_content(lines.join("\n"));
        if follow {
            self.transcript.scroll_to_bottom();
        }
        self.layout_width = Some(width);
    }

    fn is_scroll_key(key: &KeyEvent) -> bool {
        !key.ctrl
            && !key.alt
            && matches!(
                key.code,
                KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown
            )
    }
}

impl BindingProvider for ChatComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "send" => self.send(),
            "append" => match serde_json::from_value::<ChatMessage>(payload.clone()) {
                Ok(message) => {
                    self.push_message(message);
                    swallow()
                }
                Err(err) => {
                    tracing::warn!(
                        target: DISPATCH_TARGET,
                        chat = self.base.id(),
                        error = %err,
                        "ignoring malformed chat message"
                    );
                    Interception::pass()
                }
            },
            "clear_history" => {
                self.messages.clear();
                self.refresh();
                swallow()
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for ChatComponent {
    fn intercept(&mut self, key: &KeyEvent) -> Interception {
        match SpecialKey::classify(key) {
            Some(special) if special.is_focus_traversal() => tab_bubbles(),
            Some(SpecialKey::Escape) => escape_blur(&mut self.base),
            Some(SpecialKey::Enter) => self.send(),
            _ => Interception::pass(),
        }
    }
}

impl Delegate for ChatComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        match message {
            Message::Key(key) if Self::is_scroll_key(key) => {
                self.layout(self.last_width);
                self.transcript.update(message)
            }
            _ => self.composer.update(message),
        }
    }
}

impl Observable for ChatComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new()
            .with(fields::VALUE, FieldValue::Text(self.composer.value().to_string()))
            .with(fields::OFFSET, FieldValue::Number(self.transcript.offset() as i64))
            .with(fields::FOCUSED, FieldValue::Bool(self.base.is_focused()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for ChatComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        Some(self.base.is_focused())
    }
}

impl Focusable for ChatComponent {
    fn set_focused(&mut self, focused: bool) {
        self.base.set_focused(focused);
    }

    fn is_focused(&self) -> bool {
        self.base.is_focused()
    }
}

impl Component for ChatComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.layout(width);
        let mut lines = self.transcript.render(width);
        lines.extend(self.composer.render(width, self.base.is_focused()));
        lines
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Chat
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: ChatProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.height == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "height",
                value: "0".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        if let Some(height) = props.height {
            self.transcript.set_height(height);
        }
        if let Some(messages) = props.messages {
            self.messages = messages;
            self.refresh();
        }
        if let Some(value) = props.value {
            self.composer.set_value(value);
        }
        if let Some(placeholder) = props.placeholder {
            self.composer.set_placeholder(placeholder);
        }
        if let Some(prompt) = props.prompt {
            self.composer.set_prompt(prompt);
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
    use super::{ChatComponent, ChatMessage, ChatRole};
    use crate::config::AdapterDefaults;
    use crate::core::bubble::BubbleSignal;
    use crate::core::component::Component;
    use crate::core::event_bus::names;
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::{ActionMessage, Message};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn chat() -> ChatComponent {
        let mut chat = ChatComponent::new("chat", &AdapterDefaults::default());
        chat.set_focus(true);
        chat
    }

    #[test]
    fn enter_sends_and_clears() {
        let mut chat = chat();
        chat.set_value("hello");
        let result = chat.update(Message::Key(KeyEvent::new(KeyCode::Enter)));
        assert_eq!(result.signal, BubbleSignal::Handled);
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::MESSAGE_SENT);
        assert_eq!(events[0].get("value"), Some(&json!("hello")));
        assert_eq!(chat.value(), "");
        assert_eq!(chat.messages(), &[ChatMessage::new(ChatRole::User, "hello")]);
    }

    #[test]
    fn enter_on_empty_composer_is_swallowed() {
        let mut chat = chat();
        let result = chat.update(Message::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(result.is_handled());
        assert!(result.command.is_none());
        assert!(chat.messages().is_empty());
    }

    #[test]
    fn append_action_adds_assistant_reply() {
        let mut chat = chat();
        let result = chat.update(Message::Action(ActionMessage {
            component_id: "chat".to_string(),
            action: "append".to_string(),
            payload: json!({ "role": "assistant", "content": "**hi** there" }),
        }));
        assert!(result.is_handled());
        let lines = chat.render(30);
        assert_eq!(lines[0], "Assistant:                    ");
        assert_eq!(lines[1], "  hi there                    ");
    }

    #[test]
    fn scroll_keys_move_transcript_not_composer() {
        let mut chat = chat();
        chat.apply_config(&json!({
            "height": 2,
            "messages": [
                { "role": "user", "content": "one" },
                { "role": "assistant", "content": "two" },
            ],
        }))
        .expect("config applies");
        let _ = chat.render(20);
        assert_eq!(chat.transcript.offset(), 3);

        let result = chat.update(Message::Key(KeyEvent::new(KeyCode::Up)));
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::SCROLLED);
        assert_eq!(chat.value(), "");
    }

    #[test]
    fn transcript_scrolls_before_first_render() {
        let mut chat = chat();
        let messages: Vec<_> = (0..30)
            .map(|n| json!({ "role": "user", "content": format!("m{n}") }))
            .collect();
        chat.apply_config(&json!({ "height": 3, "messages": messages }))
            .expect("config applies");

        // 30 two-line messages with 29 blank separators; height 3.
        let result = chat.update(Message::Key(KeyEvent::new(KeyCode::Up)));
        assert!(result.is_handled());
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::SCROLLED);
        assert_eq!(events[0].get("old"), Some(&json!(86)));
        assert_eq!(events[0].get("new"), Some(&json!(85)));
    }

    #[test]
    fn appended_reply_is_scrollable_without_render() {
        let mut chat = chat();
        chat.apply_config(&json!({ "height": 1 })).expect("config applies");
        chat.push_message(ChatMessage::new(ChatRole::Assistant, "hello"));
        assert_eq!(chat.transcript.offset(), 1);

        let result = chat.update(Message::Key(KeyEvent::new(KeyCode::Up)));
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].get("new"), Some(&json!(0)));
    }
}
