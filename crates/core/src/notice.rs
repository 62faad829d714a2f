//! Texts shown in place of a reply when a request fails.

use leadchat_model::{ChatError, TransportFailure};

/// Shown when no session identifier is available.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please refresh the page or start a new conversation.";
/// Shown when the backend answers with an error status and no reason.
pub const UNREACHABLE: &str =
    "Unable to reach the server. Please check your connection and try again.";
/// Shown for anything else, including requests that never completed.
pub const GENERIC: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Returns the text shown to the user for `err`.
///
/// Errors reported by the backend are shown close to verbatim.
pub fn describe(err: &ChatError) -> String {
    let text = match err {
        ChatError::MissingSession => SESSION_EXPIRED,
        ChatError::Transport(TransportFailure::Status {
            reason: Some(reason),
            ..
        }) if !reason.trim().is_empty() => reason.trim(),
        ChatError::Transport(TransportFailure::Status { .. }) => UNREACHABLE,
        ChatError::Transport(
            TransportFailure::Unreachable(_) | TransportFailure::MalformedBody(_),
        ) => GENERIC,
        ChatError::Application(message) if !message.trim().is_empty() => {
            message.trim()
        }
        ChatError::Application(_) => GENERIC,
    };
    text.to_owned()
}
