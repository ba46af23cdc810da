//! User-configurable key bindings and the binding resolver.

use serde::Deserialize;

use crate::core::key::{KeyEvent, KeyPattern};
use crate::error::ConfigError;
use crate::logging::BINDING_TARGET;

/// One or more chord strings, as written in a property mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyBinding::Single(key) => vec![key],
            KeyBinding::Multiple(keys) => keys,
        }
    }
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(|item| item.to_string()).collect())
    }
}

/// Serialized form of a binding inside component properties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingSpec {
    #[serde(alias = "key")]
    pub keys: KeyBinding,
    pub action: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// A key pattern → action mapping.
///
/// Patterns that fail to parse are kept in `keys` for display but never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    keys: Vec<String>,
    patterns: Vec<KeyPattern>,
    action: String,
    enabled: bool,
}

impl Binding {
    pub fn new<K: Into<KeyBinding>>(keys: K, action: impl Into<String>) -> Self {
        let action = action.into();
        let keys = keys.into().into_vec();
        let mut patterns = Vec::with_capacity(keys.len());
        for key in &keys {
            match KeyPattern::parse(key) {
                Ok(pattern) => patterns.push(pattern),
                Err(err) => tracing::warn!(
                    target: BINDING_TARGET,
                    action = %action,
                    error = %err,
                    "malformed key pattern will never match"
                ),
            }
        }
        Self {
            keys,
            patterns,
            action,
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn matches_id(&self, key_id: &str) -> bool {
        self.enabled && self.patterns.iter().any(|pattern| pattern.id() == key_id)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.matches_id(&key.key_id())
    }
}

/// Ordered bindings owned by one component instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn from_specs(specs: Vec<BindingSpec>) -> Result<Self, ConfigError> {
        let mut bindings = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let keys = spec.keys.into_vec();
            if keys.is_empty() {
                return Err(ConfigError::EmptyBinding {
                    index,
                    action: spec.action,
                });
            }
            bindings.push(Binding::new(KeyBinding::Multiple(keys), spec.action).with_enabled(spec.enabled));
        }
        Ok(Self { bindings })
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// First enabled binding whose pattern equals the key's normalized id.
    pub fn resolve(&self, key: &KeyEvent) -> Option<&Binding> {
        if self.bindings.is_empty() {
            return None;
        }
        let key_id = key.key_id();
        let found = self.bindings.iter().find(|binding| binding.matches_id(&key_id));
        if let Some(binding) = found {
            tracing::trace!(
                target: BINDING_TARGET,
                key = %key_id,
                action = %binding.action,
                "binding matched"
            );
        }
        found
    }
}
