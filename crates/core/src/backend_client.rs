use std::pin::Pin;
use std::sync::Arc;

use leadchat_model::{ChatBackend, ChatError, ChatReply, ChatRequest};
use tracing::Instrument;

type SendResult = Result<ChatReply, ChatError>;
type BoxedSendFuture = Pin<Box<dyn Future<Output = SendResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ChatRequest) -> BoxedSendFuture + Send + Sync>;

/// A wrapper around a chat backend that provides a type-erased interface
/// for the view controller.
#[derive(Clone)]
pub struct BackendClient {
    handler_fn: HandlerFn,
}

impl BackendClient {
    #[inline]
    pub fn new<B: ChatBackend + 'static>(backend: B) -> Self {
        // Erase `B` so the view state doesn't need a generic parameter.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = backend.send_message(&req);
            Box::pin(
                async move {
                    trace!("sending: {req:?}");
                    let result = fut.await;
                    match &result {
                        Ok(reply) => {
                            debug!("got a reply of {} bytes", reply.text.len())
                        }
                        Err(err) => debug!("request failed: {err}"),
                    }
                    result
                }
                .instrument(trace_span!("backend request")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns its outcome.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe, dropping the future abandons the
    /// request.
    #[inline]
    pub async fn send_message(&self, req: ChatRequest) -> SendResult {
        (self.handler_fn)(req).await
    }
}
