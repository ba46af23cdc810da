//! Dispatch core: messages, keys, bindings, snapshots and the dispatcher.

pub mod binding;
pub mod bubble;
pub mod command;
pub mod component;
pub mod dispatch;
pub mod event_bus;
pub mod key;
pub mod message;
pub mod snapshot;
pub mod special_keys;
pub mod targeting;
pub mod text;
