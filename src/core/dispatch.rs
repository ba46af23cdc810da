//! The fixed decision procedure shared by every adapter.
//!
//! Order, evaluated once per message:
//! 1. targeting (envelopes and addressed actions),
//! 2. focus gate for keyboard messages,
//! 3. user bindings,
//! 4. special keys,
//! 5. host-reserved keys,
//! 6. delegation to the wrapped widget,
//! 7. snapshot diff → notifications.

use serde_json::json;

use crate::core::binding::BindingTable;
use crate::core::bubble::{BubbleSignal, Interception, UpdateResult};
use crate::core::command::Command;
use crate::core::key::KeyEvent;
use crate::core::message::Message;
use crate::core::snapshot::{diff, FieldChange, ObservableState};
use crate::core::targeting::{unwrap_for, Targeting};
use crate::logging::DISPATCH_TARGET;

/// Keys that always go back to the host untouched unless a user binding
/// claims them first.
pub const HOST_RESERVED_KEYS: &[&str] = &["ctrl+c"];

/// Access to a component's binding table and its action handler.
pub trait BindingProvider {
    fn bindings(&self) -> &BindingTable;

    /// Run a bound action. Called for key bindings (payload `{"key": id}`) and
    /// for replayed [`ActionMessage`](crate::core::message::ActionMessage)s.
    fn on_action(&mut self, action: &str, payload: &serde_json::Value) -> Interception;
}

/// Per-kind hook for keys with cross-component meaning.
pub trait SpecialKeyHandler {
    fn intercept(&mut self, _key: &KeyEvent) -> Interception {
        Interception::pass()
    }
}

/// Forwarding into the wrapped widget.
pub trait Delegate {
    fn delegate(&mut self, message: &Message) -> Command;

    /// Signal when delegation changed nothing and produced no command.
    fn passthrough_signal(&self) -> BubbleSignal {
        BubbleSignal::Handled
    }
}

/// Cheap snapshot of externally visible fields.
pub trait Observable {
    /// Must not have side effects.
    fn capture(&self) -> ObservableState;

    /// Every observable change made during one dispatch, for polling hosts.
    fn record_changes(&mut self, _changes: &[FieldChange]) {}
}

pub trait Dispatchable: BindingProvider + SpecialKeyHandler + Delegate + Observable {
    fn component_id(&self) -> &str;

    /// `None` for components without a focus concept.
    fn focus_flag(&self) -> Option<bool>;
}

/// Run one message through `component`, mutating it in place.
pub fn dispatch<C>(component: &mut C, message: Message) -> UpdateResult
where
    C: Dispatchable + ?Sized,
{
    let message = match unwrap_for(component.component_id(), message) {
        Targeting::Deliver(message) => message,
        Targeting::Elsewhere { target_id } => {
            tracing::trace!(
                target: DISPATCH_TARGET,
                component = component.component_id(),
                %target_id,
                "message addressed elsewhere"
            );
            return UpdateResult::ignored();
        }
    };

    if message.is_keyboard() && component.focus_flag() == Some(false) {
        tracing::trace!(
            target: DISPATCH_TARGET,
            component = component.component_id(),
            "keyboard message rejected by focus gate"
        );
        return UpdateResult::ignored();
    }

    let entry = component.capture();

    match &message {
        Message::Key(key) => {
            if let Some(result) = intercept_key(component, key) {
                return settle(component, &entry, result);
            }
        }
        Message::Action(action) => {
            let interception = component.on_action(&action.action, &action.payload);
            if interception.consumed {
                return settle(component, &entry, interception.into());
            }
        }
        _ => {}
    }

    let before = component.capture();
    let widget_command = component.delegate(&message);
    let after = component.capture();
    let changes = diff(&before, &after);

    if changes.is_empty() && widget_command.is_none() {
        let signal = component.passthrough_signal();
        tracing::trace!(
            target: DISPATCH_TARGET,
            component = component.component_id(),
            ?signal,
            "delegation produced no change"
        );
        return settle(
            component,
            &entry,
            UpdateResult {
                command: Command::None,
                signal,
            },
        );
    }

    let source_id = component.component_id().to_string();
    let notifications = changes
        .iter()
        .map(|change| change.to_notification(&source_id).publish());
    let command = Command::batch(std::iter::once(widget_command).chain(notifications));
    settle(component, &entry, UpdateResult::handled(command))
}

/// Steps 3–5 for key messages. `None` means "fall through to delegation".
fn intercept_key<C>(component: &mut C, key: &KeyEvent) -> Option<UpdateResult>
where
    C: Dispatchable + ?Sized,
{
    let key_id = key.key_id();

    let action = component
        .bindings()
        .resolve(key)
        .map(|binding| binding.action().to_string());
    if let Some(action) = action {
        let interception = component.on_action(&action, &json!({ "key": key_id }));
        if interception.consumed {
            tracing::trace!(
                target: DISPATCH_TARGET,
                component = component.component_id(),
                key = %key_id,
                %action,
                "key claimed by binding"
            );
            return Some(interception.into());
        }
    }

    let interception = component.intercept(key);
    if interception.consumed {
        tracing::trace!(
            target: DISPATCH_TARGET,
            component = component.component_id(),
            key = %key_id,
            signal = ?interception.signal,
            "key claimed by special-key handler"
        );
        return Some(interception.into());
    }

    if HOST_RESERVED_KEYS.contains(&key_id.as_str()) {
        return Some(UpdateResult::ignored());
    }

    None
}

fn settle<C>(component: &mut C, entry: &ObservableState, result: UpdateResult) -> UpdateResult
where
    C: Dispatchable + ?Sized,
{
    let changes = diff(entry, &component.capture());
    if !changes.is_empty() {
        component.record_changes(&changes);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{dispatch, BindingProvider, Delegate, Dispatchable, Observable, SpecialKeyHandler};
    use crate::core::binding::{Binding, BindingTable};
    use crate::core::bubble::{BubbleSignal, Interception};
    use crate::core::command::Command;
    use crate::core::event_bus::{names, NotificationEvent};
    use crate::core::key::{KeyCode, KeyEvent};
    use crate::core::message::{ActionMessage, Message};
    use crate::core::snapshot::{fields, FieldChange, FieldValue, ObservableState};
    use serde_json::Value;

    /// Counter widget: `+`/`-` change the value; Tab is special.
    struct Counter {
        id: String,
        focused: Option<bool>,
        value: i64,
        bindings: BindingTable,
        actions: Vec<String>,
        intercepted: usize,
        delegated: usize,
        recorded: Vec<FieldChange>,
    }

    impl Counter {
        fn new(focused: Option<bool>) -> Self {
            Self {
                id: "counter".to_string(),
                focused,
                value: 0,
                bindings: BindingTable::default(),
                actions: Vec::new(),
                intercepted: 0,
                delegated: 0,
                recorded: Vec::new(),
            }
        }
    }

    impl BindingProvider for Counter {
        fn bindings(&self) -> &BindingTable {
            &self.bindings
        }

        fn on_action(&mut self, action: &str, _payload: &Value) -> Interception {
            self.actions.push(action.to_string());
            match action {
                "reset" => {
                    self.value = 0;
                    Interception::handled(NotificationEvent::new(&self.id, "reset").publish())
                }
                _ => Interception::pass(),
            }
        }
    }

    impl SpecialKeyHandler for Counter {
        fn intercept(&mut self, key: &KeyEvent) -> Interception {
            self.intercepted += 1;
            if key.is(KeyCode::Tab) {
                return Interception::bubble(Command::None);
            }
            Interception::pass()
        }
    }

    impl Delegate for Counter {
        fn delegate(&mut self, message: &Message) -> Command {
            self.delegated += 1;
            match message.as_key().and_then(KeyEvent::text) {
                Some('+') => self.value += 1,
                Some('-') => self.value -= 1,
                _ => {}
            }
            Command::None
        }

        fn passthrough_signal(&self) -> BubbleSignal {
            BubbleSignal::Ignored
        }
    }

    impl Observable for Counter {
        fn capture(&self) -> ObservableState {
            ObservableState::new().with(fields::VALUE, FieldValue::Number(self.value))
        }

        fn record_changes(&mut self, changes: &[FieldChange]) {
            self.recorded.extend_from_slice(changes);
        }
    }

    impl Dispatchable for Counter {
        fn component_id(&self) -> &str {
            &self.id
        }

        fn focus_flag(&self) -> Option<bool> {
            self.focused
        }
    }

    fn key(ch: char) -> Message {
        Message::Key(KeyEvent::char(ch))
    }

    #[test]
    fn delegation_change_emits_value_event() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, key('+'));
        assert_eq!(result.signal, BubbleSignal::Handled);
        let events = result.command.notifications();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, names::VALUE_CHANGED);
        assert_eq!(counter.recorded.len(), 1);
    }

    #[test]
    fn unfocused_component_ignores_keys_without_side_effects() {
        let mut counter = Counter::new(Some(false));
        let result = dispatch(&mut counter, key('+'));
        assert_eq!(result.signal, BubbleSignal::Ignored);
        assert!(result.command.is_none());
        assert_eq!(counter.value, 0);
        assert_eq!(counter.intercepted, 0);
        assert_eq!(counter.delegated, 0);
    }

    #[test]
    fn focusless_component_skips_gate() {
        let mut counter = Counter::new(None);
        let result = dispatch(&mut counter, key('+'));
        assert_eq!(counter.value, 1);
        assert!(result.is_handled());
    }

    #[test]
    fn envelope_elsewhere_is_ignored() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, Message::targeted("other", key('+')));
        assert_eq!(result.signal, BubbleSignal::Ignored);
        assert_eq!(counter.value, 0);
        assert_eq!(counter.delegated, 0);
    }

    #[test]
    fn envelope_for_us_is_unwrapped() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, Message::targeted("counter", key('+')));
        assert!(result.is_handled());
        assert_eq!(counter.value, 1);
    }

    #[test]
    fn binding_beats_special_key_handler() {
        let mut counter = Counter::new(Some(true));
        counter.bindings = BindingTable::new(vec![Binding::new("tab", "reset")]);
        counter.value = 5;
        let result = dispatch(&mut counter, Message::Key(KeyEvent::new(KeyCode::Tab)));
        assert_eq!(result.signal, BubbleSignal::Handled);
        assert_eq!(counter.value, 0);
        assert_eq!(counter.intercepted, 0);
        assert_eq!(counter.delegated, 0);
        assert_eq!(counter.recorded.len(), 1);
    }

    #[test]
    fn unconsumed_binding_falls_through() {
        let mut counter = Counter::new(Some(true));
        counter.bindings = BindingTable::new(vec![Binding::new("+", "log-only")]);
        let result = dispatch(&mut counter, key('+'));
        assert_eq!(counter.actions, vec!["log-only".to_string()]);
        assert_eq!(counter.intercepted, 1);
        assert_eq!(counter.value, 1);
        assert!(result.is_handled());
    }

    #[test]
    fn special_key_bubbles_without_delegation() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, Message::Key(KeyEvent::new(KeyCode::Tab)));
        assert_eq!(result.signal, BubbleSignal::Ignored);
        assert_eq!(counter.delegated, 0);
    }

    #[test]
    fn ctrl_c_goes_back_to_host() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, Message::Key(KeyEvent::char('c').with_ctrl()));
        assert_eq!(result.signal, BubbleSignal::Ignored);
        assert_eq!(counter.delegated, 0);
    }

    #[test]
    fn no_change_uses_passthrough_signal() {
        let mut counter = Counter::new(Some(true));
        let result = dispatch(&mut counter, key('x'));
        assert_eq!(result.signal, BubbleSignal::Ignored);
        assert!(result.command.is_none());
        assert_eq!(counter.delegated, 1);
    }

    #[test]
    fn action_message_reaches_handler() {
        let mut counter = Counter::new(Some(false));
        counter.value = 3;
        let result = dispatch(
            &mut counter,
            Message::Action(ActionMessage {
                component_id: "counter".to_string(),
                action: "reset".to_string(),
                payload: Value::Null,
            }),
        );
        assert!(result.is_handled());
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn capture_twice_is_idempotent() {
        let counter = Counter::new(Some(true));
        let a = counter.capture();
        let b = counter.capture();
        assert_eq!(a, b);
        assert!(crate::core::snapshot::diff(&a, &b).is_empty());
    }
}
