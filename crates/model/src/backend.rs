use crate::error::ChatError;
use crate::request::{ChatReply, ChatRequest};

/// A type that answers chat requests.
///
/// Once the backend is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the backend should be prepared for being dropped anytime.
pub trait ChatBackend: Send + Sync {
    /// Sends one request and resolves with its outcome.
    ///
    /// The returned future must be fully independent of `self`.
    /// Implementations must not retry on their own.
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ChatError>> + Send + 'static;
}
