//! Spinner adapter. No focus concept; animation runs on host-scheduled ticks.

use std::time::Duration;

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
use crate::core::message::{Message, MessageKind};
use crate::core::snapshot::{FieldChange, FieldValue, ObservableState};
use crate::error::ConfigError;
use crate::widgets::Spinner;

const RUNNING_FIELD: &str = "running";
const SUBSCRIPTIONS: &[MessageKind] = &[
    MessageKind::Key,
    MessageKind::Tick,
    MessageKind::Targeted,
    MessageKind::Action,
];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SpinnerProps {
    #[serde(flatten)]
    common: CommonProps,
    message: Option<String>,
    frames: Option<Vec<String>>,
    interval_ms: Option<u64>,
    autostart: bool,
}

impl Default for SpinnerProps {
    fn default() -> Self {
        Self {
            common: CommonProps::default(),
            message: None,
            frames: None,
            interval_ms: None,
            autostart: true,
        }
    }
}

pub struct SpinnerComponent {
    base: ComponentBase,
    spinner: Spinner,
    autostart: bool,
}

impl SpinnerComponent {
    pub fn new(id: impl Into<String>, defaults: &AdapterDefaults) -> Self {
        let base = ComponentBase::new(id);
        let spinner = Spinner::new(base.id(), defaults);
        Self {
            base,
            spinner,
            autostart: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.spinner.is_running()
    }

    pub fn frame(&self) -> usize {
        self.spinner.frame()
    }
}

impl BindingProvider for SpinnerComponent {
    fn bindings(&self) -> &BindingTable {
        self.base.bindings()
    }

    fn on_action(&mut self, action: &str, payload: &Value) -> Interception {
        match action {
            "start" => Interception::handled(self.spinner.start()),
            "stop" => {
                self.spinner.stop();
                Interception::handled(Command::None)
            }
            "message" => {
                if let Some(message) = payload.get("message").and_then(Value::as_str) {
                    self.spinner.set_message(message);
                }
                Interception::handled(Command::None)
            }
            _ => self.base.trigger(action, payload),
        }
    }
}

impl SpecialKeyHandler for SpinnerComponent {}

impl Delegate for SpinnerComponent {
    fn delegate(&mut self, message: &Message) -> Command {
        self.spinner.update(message)
    }

    /// Stale ticks and stray keys are not ours.
    fn passthrough_signal(&self) -> BubbleSignal {
        BubbleSignal::Ignored
    }
}

impl Observable for SpinnerComponent {
    fn capture(&self) -> ObservableState {
        ObservableState::new().with(RUNNING_FIELD, FieldValue::Bool(self.spinner.is_running()))
    }

    fn record_changes(&mut self, changes: &[FieldChange]) {
        self.base.record(changes);
    }
}

impl Dispatchable for SpinnerComponent {
    fn component_id(&self) -> &str {
        self.base.id()
    }

    fn focus_flag(&self) -> Option<bool> {
        None
    }
}

impl Component for SpinnerComponent {
    fn init(&mut self) -> Command {
        if self.autostart {
            self.spinner.start()
        } else {
            Command::None
        }
    }

    fn update(&mut self, message: Message) -> UpdateResult {
        dispatch(self, message)
    }

    fn render(&mut self, width: usize) -> Vec<String> {
        self.spinner.render(width)
    }

    fn id(&self) -> &str {
        self.base.id()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Spinner
    }

    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError> {
        let props: SpinnerProps = parse_props(self.kind(), self.base.id(), props)?;
        if props.interval_ms == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "interval_ms",
                value: "0".to_string(),
            });
        }
        if props.frames.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::OutOfRange {
                field: "frames",
                value: "[]".to_string(),
            });
        }
        self.base.apply_common(props.common)?;
        self.autostart = props.autostart;
        if let Some(message) = props.message {
            self.spinner.set_message(message);
        }
        if let Some(frames) = props.frames {
            self.spinner.set_frames(frames);
        }
        if let Some(interval) = props.interval_ms {
            self.spinner.set_interval(Duration::from_millis(interval));
        }
        Ok(())
    }

    fn cleanup(&mut self) {
        self.spinner.stop();
    }

    fn take_state_changes(&mut self) -> Vec<FieldChange> {
        self.base.take_changes()
    }

    fn subscriptions(&self) -> &'static [MessageKind] {
        SUBSCRIPTIONS
    }
}
