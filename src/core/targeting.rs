//! Envelope unwrapping.

use crate::core::message::Message;
use crate::logging::DISPATCH_TARGET;

/// Outcome of checking a message's address against one component id.
#[derive(Debug, Clone, PartialEq)]
pub enum Targeting {
    /// The message (with every envelope removed) is for this component.
    Deliver(Message),
    /// Addressed to someone else.
    Elsewhere { target_id: String },
}

/// Strip envelopes addressed to `component_id`.
///
/// Nested envelopes are unwrapped level by level; a mismatch at any level
/// means the message is not ours. Action messages carrying a non-empty,
/// different component id are treated the same way.
pub fn unwrap_for(component_id: &str, message: Message) -> Targeting {
    let mut message = message;
    let mut depth = 0usize;
    loop {
        match message {
            Message::Targeted(envelope) => {
                if envelope.target_id != component_id {
                    return Targeting::Elsewhere {
                        target_id: envelope.target_id,
                    };
                }
                depth += 1;
                if depth > 1 {
                    tracing::trace!(target: DISPATCH_TARGET, depth, "nested envelope unwrapped");
                }
                message = *envelope.inner;
            }
            Message::Action(action)
                if !action.component_id.is_empty() && action.component_id != component_id =>
            {
                return Targeting::Elsewhere {
                    target_id: action.component_id,
                };
            }
            other => return Targeting::Deliver(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{unwrap_for, Targeting};
    use crate::core::key::KeyEvent;
    use crate::core::message::{ActionMessage, Message};
    use serde_json::Value;

    fn key() -> Message {
        Message::Key(KeyEvent::char('x'))
    }

    #[test]
    fn matching_envelope_is_unwrapped() {
        assert_eq!(
            unwrap_for("a", Message::targeted("a", key())),
            Targeting::Deliver(key())
        );
    }

    #[test]
    fn mismatched_envelope_is_elsewhere() {
        assert_eq!(
            unwrap_for("a", Message::targeted("b", key())),
            Targeting::Elsewhere {
                target_id: "b".to_string()
            }
        );
    }

    #[test]
    fn nested_envelopes_must_all_match() {
        let nested = Message::targeted("a", Message::targeted("a", key()));
        assert_eq!(unwrap_for("a", nested), Targeting::Deliver(key()));

        let mixed = Message::targeted("a", Message::targeted("b", key()));
        assert!(matches!(unwrap_for("a", mixed), Targeting::Elsewhere { .. }));
    }

    #[test]
    fn action_messages_respect_component_id() {
        let action = |id: &str| {
            Message::Action(ActionMessage {
                component_id: id.to_string(),
                action: "select".to_string(),
                payload: Value::Null,
            })
        };
        assert!(matches!(unwrap_for("a", action("a")), Targeting::Deliver(_)));
        assert!(matches!(unwrap_for("a", action("")), Targeting::Deliver(_)));
        assert!(matches!(unwrap_for("a", action("b")), Targeting::Elsewhere { .. }));
    }

    #[test]
    fn plain_messages_pass_through() {
        assert_eq!(unwrap_for("a", key()), Targeting::Deliver(key()));
    }
}
