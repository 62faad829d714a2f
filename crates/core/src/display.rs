//! The projection of the controller's state that a rendering layer draws.

use leadchat_actor::Timer;
use leadchat_model::{Role, Transcript};

/// Identifies a displayed message for the lifetime of a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) u64);

/// Where a message is in its visual lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Just added by the user, about to slide in.
    Entering,
    /// Fully in place.
    Shown,
    /// Fading out after the transcript was cleared.
    Leaving,
}

/// A message as it should currently be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Stable identifier, usable as a render key.
    pub id: MessageId,
    /// The author of the message.
    pub role: Role,
    /// The full text, including the part not revealed yet.
    pub text: String,
    /// How many characters of `text` are visible.
    pub visible: usize,
    /// Length of `text` in characters.
    pub len: usize,
    /// The visual phase.
    pub phase: Phase,
    /// Whether the message is a notice generated for a failed request.
    pub is_error: bool,
}

impl RenderedMessage {
    /// Returns the visible prefix of the text.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.visible) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Returns `true` while the progressive reveal is still running.
    #[inline]
    pub fn is_revealing(&self) -> bool {
        self.visible < self.len
    }
}

/// Everything a rendering layer needs to draw the chat view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Messages in transcript order.
    pub messages: Vec<RenderedMessage>,
    /// Whether the typing placeholder is shown after the messages.
    pub typing: bool,
    /// Submissions waiting for the outstanding request to finish.
    pub queued: usize,
    /// Whether a clear is in progress.
    pub clearing: bool,
    /// The current content of the input control.
    pub input: String,
    /// Whether the submit action is enabled.
    pub send_enabled: bool,
    /// Bumped every time the view should scroll to the latest content.
    pub scroll_seq: u64,
    /// The location a redirect has been scheduled to, if any.
    pub redirect: Option<String>,
}

impl ViewSnapshot {
    /// Returns `true` if nothing is going to change without further
    /// input: no request outstanding, no animation running.
    pub fn is_settled(&self) -> bool {
        !self.typing
            && self.queued == 0
            && !self.clearing
            && self
                .messages
                .iter()
                .all(|m| m.phase == Phase::Shown && !m.is_revealing())
    }
}

/// Display state of one transcript message.
pub(crate) struct Entry {
    pub id: MessageId,
    pub len: usize,
    pub visible: usize,
    pub phase: Phase,
    pub is_error: bool,
    /// The pending enter transition or reveal tick. Dropping it stops
    /// the animation.
    pub animation: Option<Timer>,
}

/// Pairs every transcript message with its display state.
pub(crate) fn project(
    transcript: &Transcript,
    entries: &[Entry],
) -> Vec<RenderedMessage> {
    debug_assert_eq!(transcript.len(), entries.len());
    transcript
        .messages()
        .iter()
        .zip(entries)
        .map(|(message, entry)| RenderedMessage {
            id: entry.id,
            role: message.role,
            text: message.text.clone(),
            visible: entry.visible,
            len: entry.len,
            phase: entry.phase,
            is_error: entry.is_error,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &str, visible: usize) -> RenderedMessage {
        RenderedMessage {
            id: MessageId(1),
            role: Role::Assistant,
            text: text.to_owned(),
            visible,
            len: text.chars().count(),
            phase: Phase::Shown,
            is_error: false,
        }
    }

    #[test]
    fn test_visible_text() {
        assert_eq!(rendered("Hello", 0).visible_text(), "");
        assert_eq!(rendered("Hello", 3).visible_text(), "Hel");
        assert_eq!(rendered("Hello", 5).visible_text(), "Hello");
        assert_eq!(rendered("héllo", 2).visible_text(), "hé");
        assert!(rendered("héllo", 2).is_revealing());
        assert!(!rendered("héllo", 5).is_revealing());
    }
}
