//! Component contract shared by every adapter.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::core::binding::{BindingSpec, BindingTable};
use crate::core::bubble::{Interception, UpdateResult};
use crate::core::command::Command;
use crate::core::event_bus::{names, NotificationEvent};
use crate::core::message::{Message, MessageKind};
use crate::core::snapshot::FieldChange;
use crate::error::ConfigError;
use crate::logging::CONFIG_TARGET;

/// Message kinds an interactive adapter listens to.
pub const INTERACTIVE_SUBSCRIPTIONS: &[MessageKind] = &[
    MessageKind::Key,
    MessageKind::Paste,
    MessageKind::Targeted,
    MessageKind::Action,
    MessageKind::Custom,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Input,
    TextArea,
    List,
    Menu,
    Table,
    Viewport,
    Spinner,
    Progress,
    Chat,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Input => "input",
            ComponentKind::TextArea => "textarea",
            ComponentKind::List => "list",
            ComponentKind::Menu => "menu",
            ComponentKind::Table => "table",
            ComponentKind::Viewport => "viewport",
            ComponentKind::Spinner => "spinner",
            ComponentKind::Progress => "progress",
            ComponentKind::Chat => "chat",
        }
    }
}

/// Hosted component interface.
pub trait Component {
    /// Initial command, run once when the component is mounted.
    fn init(&mut self) -> Command {
        Command::None
    }

    /// Handle one message. The component is updated in place.
    fn update(&mut self, message: Message) -> UpdateResult;

    /// Render to a list of lines at the given width.
    fn render(&mut self, width: usize) -> Vec<String>;

    fn id(&self) -> &str;

    fn kind(&self) -> ComponentKind;

    /// Replace configuration from a property mapping.
    ///
    /// On error nothing is applied.
    fn apply_config(&mut self, props: &Value) -> Result<(), ConfigError>;

    /// Release anything the component holds before it is unmounted.
    fn cleanup(&mut self) {}

    /// Observable changes accumulated since the last call.
    fn take_state_changes(&mut self) -> Vec<FieldChange>;

    fn subscriptions(&self) -> &'static [MessageKind] {
        INTERACTIVE_SUBSCRIPTIONS
    }

    /// Optional focusable behavior.
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        None
    }

    /// Host-driven focus change. No-op for components without focus.
    fn set_focus(&mut self, focused: bool) {
        if let Some(focusable) = self.as_focusable() {
            focusable.set_focused(focused);
        }
    }
}

/// Focusable behavior for components that track focus.
pub trait Focusable {
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
}

/// State every adapter carries: identity, focus, bindings and pending changes.
#[derive(Debug, Clone, Default)]
pub struct ComponentBase {
    id: String,
    focused: bool,
    bindings: BindingTable,
    pending: Vec<FieldChange>,
}

impl ComponentBase {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: BindingTable) {
        self.bindings = bindings;
    }

    pub fn record(&mut self, changes: &[FieldChange]) {
        self.pending.extend_from_slice(changes);
    }

    pub fn take_changes(&mut self) -> Vec<FieldChange> {
        std::mem::take(&mut self.pending)
    }

    /// Apply the shared part of a property mapping.
    pub fn apply_common(&mut self, common: CommonProps) -> Result<(), ConfigError> {
        let bindings = BindingTable::from_specs(common.bindings)?;
        self.bindings = bindings;
        if let Some(focused) = common.focused {
            self.focused = focused;
        }
        Ok(())
    }

    /// Fallback for actions the adapter has no built-in meaning for.
    ///
    /// The host receives `binding_triggered` and the key stops here.
    pub fn trigger(&self, action: &str, payload: &Value) -> Interception {
        let mut event = NotificationEvent::new(&self.id, names::BINDING_TRIGGERED).with("action", action);
        if let Some(key) = payload.get("key") {
            event = event.with("key", key.clone());
        } else if !payload.is_null() {
            event = event.with("payload", payload.clone());
        }
        Interception::handled(event.publish())
    }
}

/// Properties every adapter understands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommonProps {
    pub bindings: Vec<BindingSpec>,
    pub focused: Option<bool>,
}

/// Deserialize a property mapping, tagging failures with the component.
pub fn parse_props<T: DeserializeOwned>(
    kind: ComponentKind,
    id: &str,
    props: &Value,
) -> Result<T, ConfigError> {
    serde_json::from_value(props.clone()).map_err(|source| {
        tracing::warn!(
            target: CONFIG_TARGET,
            kind = kind.as_str(),
            id,
            error = %source,
            "rejected component properties"
        );
        ConfigError::InvalidProps {
            kind: kind.as_str(),
            id: id.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_props, CommonProps, ComponentBase, ComponentKind};
    use crate::core::event_bus::names;
    use crate::error::ConfigError;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn common_props_apply_bindings_and_focus() {
        let mut base = ComponentBase::new("name");
        let common: CommonProps = parse_props(
            ComponentKind::Input,
            "name",
            &json!({ "focused": true, "bindings": [{ "key": "ctrl+s", "action": "save" }] }),
        )
        .expect("props parse");
        base.apply_common(common).expect("props apply");
        assert!(base.is_focused());
        assert_eq!(base.bindings().len(), 1);
    }

    #[test]
    fn malformed_props_name_the_component() {
        let err = parse_props::<CommonProps>(ComponentKind::List, "files", &json!({ "focused": "yes" }))
            .expect_err("type mismatch");
        assert_matches!(err, ConfigError::InvalidProps { kind: "list", ref id, .. } if id == "files");
    }

    #[test]
    fn unknown_action_becomes_binding_triggered() {
        let base = ComponentBase::new("name");
        let interception = base.trigger("save", &json!({ "key": "ctrl+s" }));
        assert!(interception.consumed);
        let events = interception.command.notifications();
        assert_eq!(events[0].name, names::BINDING_TRIGGERED);
        assert_eq!(events[0].get("action"), Some(&json!("save")));
        assert_eq!(events[0].get("key"), Some(&json!("ctrl+s")));
    }
}
