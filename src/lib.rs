//! Widget adapters for a message-driven terminal UI.
//!
//! Invariant: every adapter routes messages through one dispatcher
//! ([`dispatch`]), so targeting, focus gating, bindings, special keys and
//! change notifications behave the same for every component kind.
//!
//! # Public API Overview
//! - Build adapters from [`components`] and drive them with [`Message`]s.
//! - Configure them from JSON property maps via [`Component::apply_config`].
//! - Read results from [`UpdateResult`]: a [`BubbleSignal`] plus a [`Command`]
//!   carrying [`NotificationEvent`]s.
//! - Use the text and width helpers for ANSI-safe formatting.

pub mod config;
pub mod error;
pub mod logging;

pub mod components;
pub mod core;
pub mod widgets;

/// Built-in adapters.
pub use crate::components::{
    ChatComponent, ChatMessage, ChatRole, InputComponent, ListComponent, MenuComponent, MenuItem,
    ProgressComponent, SpinnerComponent, TableComponent, TextAreaComponent, ViewportComponent,
};

/// Wrapped widgets.
pub use crate::widgets::{
    Column, ProgressBar, SelectItem, SelectList, Spinner, Table, TextArea, TextInput, Viewport,
};

/// Component contract and shared adapter state.
pub use crate::core::component::{
    Component, ComponentBase, ComponentKind, Focusable, INTERACTIVE_SUBSCRIPTIONS,
};

/// Dispatcher and the seams adapters implement.
pub use crate::core::dispatch::{
    dispatch, BindingProvider, Delegate, Dispatchable, Observable, SpecialKeyHandler,
    HOST_RESERVED_KEYS,
};

/// Messages, keys and commands.
pub use crate::core::bubble::{BubbleSignal, Interception, UpdateResult};
pub use crate::core::command::Command;
pub use crate::core::key::{KeyCode, KeyEvent, KeyPattern};
pub use crate::core::message::{
    parse_input, ActionMessage, Envelope, Message, MessageKind, TickMessage,
};

/// Bindings, snapshots and notifications.
pub use crate::core::binding::{Binding, BindingSpec, BindingTable, KeyBinding};
pub use crate::core::event_bus::NotificationEvent;
pub use crate::core::snapshot::{FieldChange, FieldValue, ObservableState};

/// Configuration and errors.
pub use crate::config::{AdapterDefaults, EnvConfig};
pub use crate::error::{ConfigError, KeyPatternError};

/// Returns whether a component exposes focus behavior via [`Focusable`].
pub fn is_focusable(component: &mut dyn Component) -> bool {
    component.as_focusable().is_some()
}

/// ANSI-aware truncation helper.
pub use crate::core::text::truncate_to_width;
/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::visible_width;
