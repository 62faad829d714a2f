use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the chat view.
    User,
    /// The backend, or a notice generated on its behalf.
    Assistant,
}

/// A complete chat message.
///
/// Messages are immutable once created. How much of the text is visible
/// at a given moment is a display concern, not part of the message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub role: Role,
    /// The full text of the message.
    pub text: String,
}

impl Message {
    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// An ordered list of displayed messages.
///
/// The transcript only grows, except for [`Transcript::clear`] which
/// empties it entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Appends a message at the end.
    #[inline]
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes every message.
    #[inline]
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Removes the first `count` messages, keeping the rest in order.
    ///
    /// Used when messages that were present before a clear finish leaving
    /// while newer ones have been appended in the meantime.
    #[inline]
    pub fn drain_front(&mut self, count: usize) {
        let count = count.min(self.messages.len());
        self.messages.drain(..count);
    }

    /// Returns the messages in order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_shape() {
        let value = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(value, json!({ "role": "user", "text": "Hello" }));
    }

    #[test]
    fn test_drain_front() {
        let mut transcript = Transcript::default();
        transcript.push(Message::assistant("Welcome"));
        transcript.push(Message::user("Hi"));
        transcript.push(Message::assistant("Hello"));
        transcript.drain_front(2);
        assert_eq!(transcript.messages(), &[Message::assistant("Hello")]);

        transcript.drain_front(5);
        assert!(transcript.is_empty());
    }
}
