//! Bubbling signal and step results.

use crate::core::command::Command;

/// Whether a message stops at this component or may propagate further.
///
/// `Ignored` lets the host re-deliver the same message to ancestors and global
/// bindings; `Handled` stops propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleSignal {
    Handled,
    Ignored,
}

impl BubbleSignal {
    pub fn is_handled(self) -> bool {
        self == BubbleSignal::Handled
    }
}

/// What a binding action or special-key hook decided about one key.
///
/// `consumed == false` means "no claim": the dispatcher moves on to the next
/// step and `command`/`signal` are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Interception {
    pub command: Command,
    pub signal: BubbleSignal,
    pub consumed: bool,
}

impl Interception {
    pub fn pass() -> Self {
        Self {
            command: Command::None,
            signal: BubbleSignal::Ignored,
            consumed: false,
        }
    }

    /// Claimed, propagation stops.
    pub fn handled(command: Command) -> Self {
        Self {
            command,
            signal: BubbleSignal::Handled,
            consumed: true,
        }
    }

    /// Claimed, but ancestors still get a turn at the same message.
    pub fn bubble(command: Command) -> Self {
        Self {
            command,
            signal: BubbleSignal::Ignored,
            consumed: true,
        }
    }
}

/// Result of one update: the deferred command and the bubbling signal.
///
/// The component itself is updated in place.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct UpdateResult {
    pub command: Command,
    pub signal: BubbleSignal,
}

impl UpdateResult {
    pub fn ignored() -> Self {
        Self {
            command: Command::None,
            signal: BubbleSignal::Ignored,
        }
    }

    pub fn handled(command: Command) -> Self {
        Self {
            command,
            signal: BubbleSignal::Handled,
        }
    }

    pub fn is_handled(&self) -> bool {
        self.signal.is_handled()
    }
}

impl From<Interception> for UpdateResult {
    fn from(interception: Interception) -> Self {
        Self {
            command: interception.command,
            signal: interception.signal,
        }
    }
}
