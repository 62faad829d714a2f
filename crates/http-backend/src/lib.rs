//! A chat backend that talks to an HTTP chat endpoint.
//!
//! Each request is a single `POST {base}/chat?lead_id=...` with a JSON
//! body. No retries are attempted, and unless a timeout is configured
//! the transport default applies.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::sync::Arc;

use leadchat_model::{
    ChatBackend, ChatError, ChatReply, ChatRequest, TransportFailure,
};
use reqwest::{Client, Response, header};

pub use config::{ConfigError, HttpBackendConfig, HttpBackendConfigBuilder};
use proto::ChatRequestBody;

/// HTTP chat backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<HttpBackendConfig>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with the given configuration.
    pub fn new(config: HttpBackendConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ConfigError::Client(format!("{err}")))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

impl ChatBackend for HttpBackend {
    fn send_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ChatError>> + Send + 'static
    {
        let url = self.config.chat_url(&req.lead_id);
        trace!("posting to {url}");
        let resp_fut = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&ChatRequestBody::from(req))
            .send();

        async move { receive(resp_fut.await).await }
    }
}

async fn receive(
    resp_or_err: Result<Response, reqwest::Error>,
) -> Result<ChatReply, ChatError> {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            return Err(ChatError::Transport(TransportFailure::Unreachable(
                format!("{err}"),
            )));
        }
    };

    let status = resp.status();
    let is_json = proto::is_json(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );
    let body = match resp.bytes().await {
        Ok(body) => body,
        Err(err) => {
            return Err(ChatError::Transport(TransportFailure::Unreachable(
                format!("{err}"),
            )));
        }
    };
    debug!("received {} bytes with status {status}", body.len());

    proto::interpret(status.as_u16(), status.is_success(), is_json, &body)
}

#[cfg(test)]
mod tests {
    use leadchat_model::LeadId;
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    /// What the local server saw.
    struct Received {
        request_line: String,
        head: String,
        body: Value,
    }

    /// Serves a single request with the given status line, content type
    /// and body. Returns the base URL and the request it received.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        reply_body: &'static str,
    ) -> (String, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _addr) = listener.accept().await.unwrap();
            let received = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{reply_body}",
                reply_body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            received
        });
        (base_url, server)
    }

    async fn read_request(stream: &mut TcpStream) -> Received {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request ended");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().unwrap())
            })
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the body ended");
            buf.extend_from_slice(&chunk[..n]);
        }

        let body = serde_json::from_slice(
            &buf[head_end..head_end + content_length],
        )
        .unwrap();
        Received {
            request_line: head.lines().next().unwrap_or_default().to_owned(),
            head: head.to_ascii_lowercase(),
            body,
        }
    }

    fn backend(base_url: &str) -> HttpBackend {
        let config = HttpBackendConfigBuilder::with_base_url(base_url)
            .build()
            .unwrap();
        HttpBackend::new(config).unwrap()
    }

    fn request(message: &str, lead_id: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_owned(),
            lead_id: LeadId::parse(lead_id).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_post_chat() {
        let (base_url, server) =
            serve_once("200 OK", "application/json", r#"{"response":"Hi"}"#)
                .await;

        let reply = backend(&base_url)
            .send_message(&request("Hello", "a b&c"))
            .await
            .unwrap();
        assert_eq!(reply.text, "Hi");

        let received = server.await.unwrap();
        assert_eq!(
            received.request_line,
            "POST /chat?lead_id=a+b%26c HTTP/1.1"
        );
        assert!(received.head.contains("content-type: application/json"));
        assert_eq!(
            received.body,
            json!({ "message": "Hello", "lead_id": "a b&c" })
        );
    }

    #[tokio::test]
    async fn test_error_status() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"error":"bad request"}"#,
        )
        .await;
        let err = backend(&base_url)
            .send_message(&request("Hello", "lead-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChatError::Transport(TransportFailure::Status {
                code: 400,
                reason: Some("bad request".to_owned()),
            })
        );
        server.await.unwrap();

        // Same body, without the JSON label.
        let (base_url, server) = serve_once(
            "400 Bad Request",
            "text/plain",
            r#"{"error":"bad request"}"#,
        )
        .await;
        let err = backend(&base_url)
            .send_message(&request("Hello", "lead-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChatError::Transport(TransportFailure::Status {
                code: 400,
                reason: Some("bad request".to_owned()),
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_application_error() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"error":"rate limited"}"#,
        )
        .await;
        let err = backend(&base_url)
            .send_message(&request("Hello", "lead-1"))
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::Application("rate limited".to_owned()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable() {
        // Nothing listens on the discard port of the loopback address.
        let err = backend("http://127.0.0.1:9")
            .send_message(&request("Hi", "lead-1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChatError::Transport(TransportFailure::Unreachable(_))
        ));
    }
}
