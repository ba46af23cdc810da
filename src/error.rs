use thiserror::Error;

/// Errors surfaced while applying a property mapping to a component.
///
/// A component that returns one of these keeps its last-good state.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid properties for {kind} component '{id}': {source}")]
    InvalidProps {
        kind: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("binding #{index} for action '{action}' has no key patterns")]
    EmptyBinding { index: usize, action: String },

    #[error("property '{field}' is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Errors produced while parsing a key pattern such as `"ctrl+shift+tab"`.
///
/// The binding resolver never propagates these: a pattern that fails to parse
/// simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPatternError {
    #[error("key pattern is empty")]
    Empty,

    #[error("key pattern '{pattern}' has no key after its modifiers")]
    MissingKey { pattern: String },

    #[error("key pattern '{pattern}' uses unknown modifier '{modifier}'")]
    UnknownModifier { pattern: String, modifier: String },

    #[error("key pattern '{pattern}' names unknown key '{key}'")]
    UnknownKey { pattern: String, key: String },
}
