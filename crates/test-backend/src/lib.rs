//! A local fake chat backend for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use leadchat_model::{
    ChatBackend, ChatError, ChatReply, ChatRequest, TransportFailure,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Default)]
struct Shared {
    script: VecDeque<PresetReply>,
    requests: Vec<ChatRequest>,
}

/// A local fake chat backend for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// backend should answer each request, in order. If the script runs out, the
/// request fails as if the backend were unreachable.
///
/// Clones share the script and the request log, so a test can keep one
/// handle to inspect what the code under test has sent.
///
/// # Note
///
/// This type is not optimized for production use. You should only use it
/// for testing.
#[derive(Clone, Default)]
pub struct TestBackend {
    shared: Arc<Mutex<Shared>>,
    delay: Option<Duration>,
}

impl TestBackend {
    /// Appends an answer to the script.
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.lock().script.push_back(preset);
    }

    /// Sets how long every request takes, unless its preset says otherwise.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.lock().requests.clone()
    }

    /// Returns how many requests have been received.
    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ChatBackend for TestBackend {
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ChatError>> + Send + 'static
    {
        let preset = {
            let mut shared = self.lock();
            shared.requests.push(req.clone());
            shared.script.pop_front()
        };
        let delay = preset
            .as_ref()
            .and_then(|p| p.delay)
            .or(self.delay)
            .unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match preset {
                Some(preset) => preset.outcome.into_result(),
                None => Err(TransportFailure::Unreachable(
                    "no enough presets".to_owned(),
                )
                .into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use leadchat_model::LeadId;
    use tokio::time::Instant;

    use super::*;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_owned(),
            lead_id: LeadId::parse("lead-1").unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_script() {
        let mut backend = TestBackend::default();
        backend.set_delay(Duration::from_millis(100));
        backend.add_reply(PresetReply::with_text("Hello!"));
        backend.add_reply(
            PresetReply::with_outcome(PresetOutcome::ApplicationError(
                "rate limited".to_owned(),
            ))
            .with_delay(Duration::from_millis(5)),
        );

        let observer = backend.clone();

        let start = Instant::now();
        let reply = backend.send_message(&request("Hi")).await.unwrap();
        assert_eq!(reply.text, "Hello!");
        assert!(start.elapsed() >= Duration::from_millis(100));

        let err = backend.send_message(&request("Again")).await.unwrap_err();
        assert_eq!(err, ChatError::Application("rate limited".to_owned()));

        let err = backend.send_message(&request("More")).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Transport(TransportFailure::Unreachable(_))
        ));

        let messages: Vec<_> = observer
            .requests()
            .into_iter()
            .map(|req| req.message)
            .collect();
        assert_eq!(messages, ["Hi", "Again", "More"]);
    }
}
