use std::future::ready;
use std::time::Duration;

use leadchat_model::{
    ChatBackend, ChatError, ChatReply, ChatRequest, LeadId, TransportFailure,
};
use tokio::time::sleep;

/// Answers with the message it received, unless asked to fail.
struct EchoBackend;

impl ChatBackend for EchoBackend {
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ChatError>> + Send + 'static
    {
        let message = req.message.clone();
        async move {
            sleep(Duration::from_millis(1)).await;
            match message.as_str() {
                "offline" => Err(TransportFailure::Unreachable(
                    "connection refused".to_owned(),
                )
                .into()),
                "busy" => Err(ChatError::Application("rate limited".to_owned())),
                _ => Ok(ChatReply {
                    text: format!("You said {message}"),
                }),
            }
        }
    }
}

/// A backend whose futures are ready immediately.
struct ReadyBackend;

impl ChatBackend for ReadyBackend {
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ChatError>> + Send + 'static
    {
        ready(Ok(ChatReply {
            text: req.lead_id.to_string(),
        }))
    }
}

fn request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_owned(),
        lead_id: LeadId::parse("lead-1").unwrap(),
    }
}

#[tokio::test]
async fn test_reply() {
    let reply = EchoBackend
        .send_message(&request("Good morning"))
        .await
        .unwrap();
    assert_eq!(reply.text, "You said Good morning");

    let reply = ReadyBackend.send_message(&request("x")).await.unwrap();
    assert_eq!(reply.text, "lead-1");
}

#[tokio::test]
async fn test_errors() {
    let err = EchoBackend
        .send_message(&request("offline"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChatError::Transport(TransportFailure::Unreachable(_))
    ));

    let err = EchoBackend.send_message(&request("busy")).await.unwrap_err();
    assert_eq!(err, ChatError::Application("rate limited".to_owned()));
}

#[tokio::test]
async fn test_future_outlives_backend() {
    let fut = {
        let backend = EchoBackend;
        backend.send_message(&request("Hi"))
    };
    assert_eq!(fut.await.unwrap().text, "You said Hi");
}
