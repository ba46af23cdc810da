//! Progress bar adapter.
//!
//! Progress is driven by `set`/`increment`/`reset` requests, delivered either
//! as [`ActionMessage`](crate::core::message::ActionMessage)s or as
//! `Message::Custom` with the same names and a `{ "value": f64 }` payload.
//! A key bound to one of them applies it directly; `increment` without a
//! value advances by the configured step.

use serde::Deserialize;
use serde_json::Value;

use crate::config::AdapterDefaults;
use crate::core::binding::BindingTable;
use crate::core::bubble::{BubbleSignal, Interception, UpdateResult};
use crate::core::command::Command;
use crate::core::component::{parse_props, CommonProps, Component, ComponentBase, ComponentKind};
use crate::core::dispatch::{
    dispatch, BindingProvider, Delegate, Dispatchable, Observable, SpecialKeyHandler,
};
use crate::core::event_bus::{names, NotificationEvent};
use crate::core::message::{Message, MessageKind};
use crate::core::snapshot::{diff, fields, FieldChange, FieldValue, ObservableState};
use crate::error::ConfigError;
use crate::widgets::ProgressBar;

const SUBSCRIPTIONS: &[MessageKind] = &[
    MessageKind::Key,
    MessageKind::Targeted,
    MessageKind::Action,
    MessageKind::Custom,
];

const PROGRESS_REQUESTS: &[&str] = &["set", "increment", "reset"];
const DEFAULT_STEP: f64 = 0.1;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProgressProps {
    #[serde(flatten)]
    common: CommonProps,
    value: Option<f64>,
    width: Option<usize>,
    label: Option<String>,
    show_percent: Option<bool>,
    step: Option<f64>,
}

pub struct ProgressComponent {
    base: ComponentBase,
    bar: ProgressBar,
    step: f64,
}

impl ProgressComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        Self {
            base: ComponentBase::new(id),
            bar: ProgressBar::new(defaults),
            step: DEFAULT_STEP,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.bar.ratio()
    }

    /// `None` when the request is unknown or lacks the value it needs.
    fn apply_request(&mut self, name: &str, payload: &Value) -> Option<Command> {
        let amount = payload
            .get("value")
            .and_then(Value::as_f64)
            .or_else(|| payload.as_f64());
        let was_complete = self.bar.is_complete();
        match (name, amount) {
            ("set", Some(value)) => self.bar.set_ratio(value),
            ("increment", delta) => self.bar.increment(delta.unwrap_or(self.step)),
            ("reset", _) => self.bar.set_ratio(0.0),
            _ => return None,
        }
        if self.bar.is_complete() && !was_complete {
            return Some(NotificationEvent::new(self.base.id(), names::PROGRESS_COMPLETED).publish());
        }
        Some(Command::None)
    }

    /// A bound key never reaches delegation, so its effect is diffed here.
    fn apply_bound_request(&mut self, name: &str, payload: &Value) -> Interception {
        let before = self.capture();
        let Some(command) = self.apply_request(name, payload) else {
            return self.base.trigger(name, payload);
        };
        let changes = diff(&before, &self.capture());
        let notifications: Vec<Command> = changes
            .iter()
            .map(|change| change.to_notification(self.base.id()).publish())
            .collect();
        Interception::handled(Command::batch(std::iter::once(command).chain(notifications)))
    }
}

impl BindingProvider for ProgressComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    /// Replayed progress requests fall through to delegation so their effect
    /// is diffed there; bound keys are applied here.
    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        if !PROGRESS_REQUESTS.contains(&action) {
            return self.base.trigger(action, payload);
        }
        if payload.get("key").is_some() {
            return self.apply_bound_request(action, payload);
        }
        Interception::pass()
    }
}

impl SpecialKeyHandler for ProgressComponent {}

impl Delegate for ProgressComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        match message {
            Message::Action(action) => self
                .apply_request(&action.action, &action.payload)
                .unwrap_or_default(),
            Message::Custom { name, payload } => {
                self.apply_request(name, payload).unwrap_or_default()
            }
            _ => Command::None,
        }
    }

    fn passthrough_signal(&self) -> BubbleSignal {
        BubbleSignal::Ignored
    }
}

impl Observable for ProgressComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new().with(fields::VALUE, FieldValue::Number(self.bar.percent()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for ProgressComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        None
    }
}

impl Component for ProgressComponent {
    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.bar.render(width)
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Progress
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: ProgressProps = parse_props(self.kind(), self.base.id(), props)?;
        if let Some(value) = props.value {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field: "value",
                    value: value.to_string(),
                });
            }
        }
        if let Some(step) = props.step {
            if !(step > 0.0 && step <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field: "step",
                    value: step.to_string(),
                });
            }
        }
        self.base.apply_common(props.common)?;
        if let Some(step) = props.step {
            self.step = step;
        }
        if let Some(value) = props.value {
            self.bar.set_ratio(value);
        }
        if let Some(width) = props.width {
            self.bar.set_width(width);
        }
        if let Some(label) = props.label {
            self.bar.set_label(label);
        }
        if let Some(show) = props.show_percent {
            self.bar.set_show_percent(show);
        }
        Ok(())
    }

    fn take_state_changes(&mut self) -> Vec<FieldChange> {
        self.base.take_changes()
    }

    fn subscriptions(&self) -> &'static [MessageKind] {
        SUBSCRIPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressComponent;
    use crate::config::AdapterDefaults;
    use crate::core::bubble::BubbleSignal;
    use crate::core::component::Component;
    use crate::core::event_bus::names;
    use crate::core::key::KeyEvent;
    use crate::core::message::{ActionMessage, Message};
    use crate::error::ConfigError;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn progress() -> ProgressComponent {
        ProgressComponent::new("upload", &AdapterDefaults::default())
    }

    fn custom(name: &str, value: f64) -> Message {
        Message::Custom {
            name: name.to_string(),
            payload: json!({ "value": value }),
        }
    }

    #[test]
    fn set_emits_value_changed_in_percent() {
        let mut progress = progress();
        let result = progress.update(custom("set", 0.25));
        assert!(result.is_handled());
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::VALUE_CHANGED);
        assert_eq!(events[0].get("new"), Some(&json!(25)));
    }

    #[test]
    fn reaching_full_publishes_completion_first() {
        let mut progress = progress();
        let _ = progress.update(custom("set", 0.9));
        let result = progress.update(Message::Action(ActionMessage {
            component_id: String::new(),
            action: "increment".to_string(),
            payload: json!({ "value": 0.5 }),
        }));
        let seen: Vec<String> = result
            .command
            .notifications()
            .iter()
            .map(|event| event.name.clone())
            .collect();
        assert_eq!(seen, vec![names::PROGRESS_COMPLETED, names::VALUE_CHANGED]);
        assert_eq!(progress.ratio(), 1.0);
    }

    #[test]
    fn unrelated_messages_bubble() {
        let mut progress = progress();
        let result = progress.update(Message::Resize { columns: 80, rows: 24 });
        assert_eq!(result.signal, BubbleSignal::Ignored);
    }

    #[test]
    fn bound_key_applies_request() {
        let mut progress = progress();
        progress
            .apply_config(&json!({
                "step": 0.25,
                "bindings": [
                    { "key": "+", "action": "increment" },
                    { "key": "0", "action": "reset" },
                ],
            }))
            .expect("config applies");

        let result = progress.update(Message::Key(KeyEvent::char('+')));
        assert!(result.is_handled());
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::VALUE_CHANGED);
        assert_eq!(events[0].get("new"), Some(&json!(25)));
        assert_eq!(progress.ratio(), 0.25);
        assert_eq!(progress.take_state_changes().len(), 1);

        let reset = progress.update(Message::Key(KeyEvent::char('0')));
        assert_eq!(reset.command.notifications()[0].get("new"), Some(&json!(0)));
        assert_eq!(progress.ratio(), 0.0);
    }

    #[test]
    fn bound_set_without_value_reports_binding() {
        let mut progress = progress();
        progress
            .apply_config(&json!({ "bindings": [{ "key": "s", "action": "set" }] }))
            .expect("config applies");
        let result = progress.update(Message::Key(KeyEvent::char('s')));
        assert!(result.is_handled());
        assert_eq!(
            result.command.notifications()[0].name,
            names::BINDING_TRIGGERED
        );
        assert_eq!(progress.ratio(), 0.0);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let mut progress = progress();
        assert_matches!(
            progress.apply_config(&json!({ "value": 1.5 })),
            Err(ConfigError::OutOfRange { field: "value", .. })
        );
        assert_eq!(progress.ratio(), 0.0);
    }
}
