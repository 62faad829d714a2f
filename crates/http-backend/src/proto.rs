use leadchat_model::{ChatError, ChatReply, ChatRequest, TransportFailure};
use mime::Mime;
use serde::{Deserialize, Serialize};

// ----------------------
// Types sent to the server
// ----------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatRequestBody<'a> {
    pub message: &'a str,
    pub lead_id: &'a str,
}

impl<'a> From<&'a ChatRequest> for ChatRequestBody<'a> {
    #[inline]
    fn from(req: &'a ChatRequest) -> Self {
        Self {
            message: &req.message,
            lead_id: req.lead_id.as_str(),
        }
    }
}

// ----------------------------
// Types received from the server
// ----------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ReplyBody {
    response: Option<String>,
    error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// -----------
// Conversions
// -----------

/// Returns `true` if the content type names a JSON payload.
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
        })
        .unwrap_or(false)
}

/// Turns a received status and body into the outcome of the request.
///
/// The body is parsed as JSON whatever the content type says. An `error`
/// field wins over `response` even when the status is a success, and
/// blank error texts count as absent.
pub fn interpret(
    status: u16,
    is_success: bool,
    is_json: bool,
    body: &[u8],
) -> Result<ChatReply, ChatError> {
    if !is_json {
        debug!("response is not labeled as json, parsing anyway");
    }

    if !is_success {
        let reason = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|reason| !reason.trim().is_empty());
        return Err(ChatError::Transport(TransportFailure::Status {
            code: status,
            reason,
        }));
    }

    let reply = match serde_json::from_slice::<ReplyBody>(body) {
        Ok(reply) => reply,
        Err(err) => {
            return Err(ChatError::Transport(TransportFailure::MalformedBody(
                format!("{err}"),
            )));
        }
    };

    match reply {
        ReplyBody {
            error: Some(error), ..
        } if !error.is_empty() => Err(ChatError::Application(error)),
        ReplyBody {
            response: Some(text),
            ..
        } => Ok(ChatReply { text }),
        _ => Err(ChatError::Transport(TransportFailure::MalformedBody(
            "missing `response` field".to_owned(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use leadchat_model::LeadId;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body() {
        let req = ChatRequest {
            message: "What plans do you offer?".to_owned(),
            lead_id: LeadId::parse("lead-42").unwrap(),
        };
        let body = serde_json::to_value(ChatRequestBody::from(&req)).unwrap();
        assert_eq!(
            body,
            json!({ "message": "What plans do you offer?", "lead_id": "lead-42" })
        );
    }

    #[test]
    fn test_content_type() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(is_json(Some("application/problem+json")));
        assert!(!is_json(Some("text/html; charset=utf-8")));
        assert!(!is_json(None));
    }

    #[test]
    fn test_reply() {
        let reply = interpret(200, true, true, br#"{"response":"Hi"}"#);
        assert_eq!(
            reply,
            Ok(ChatReply {
                text: "Hi".to_owned()
            })
        );
    }

    #[test]
    fn test_error_with_success_status() {
        let reply = interpret(200, true, true, br#"{"error":"rate limited"}"#);
        assert_eq!(reply, Err(ChatError::Application("rate limited".to_owned())));

        // An empty error does not count.
        let reply =
            interpret(200, true, true, br#"{"response":"ok","error":""}"#);
        assert_eq!(
            reply,
            Ok(ChatReply {
                text: "ok".to_owned()
            })
        );
    }

    #[test]
    fn test_error_status() {
        let reply = interpret(400, false, true, br#"{"error":"bad request"}"#);
        assert_eq!(
            reply,
            Err(ChatError::Transport(TransportFailure::Status {
                code: 400,
                reason: Some("bad request".to_owned()),
            }))
        );

        // The reason is kept when the body is JSON but not labeled so.
        let reply = interpret(400, false, false, br#"{"error":"bad request"}"#);
        assert_eq!(
            reply,
            Err(ChatError::Transport(TransportFailure::Status {
                code: 400,
                reason: Some("bad request".to_owned()),
            }))
        );

        let reply = interpret(400, false, false, b"Missing lead_id parameter");
        assert_eq!(
            reply,
            Err(ChatError::Transport(TransportFailure::Status {
                code: 400,
                reason: None,
            }))
        );

        let reply = interpret(500, false, true, b"");
        assert_eq!(
            reply,
            Err(ChatError::Transport(TransportFailure::Status {
                code: 500,
                reason: None,
            }))
        );
    }

    #[test]
    fn test_malformed_body() {
        let reply = interpret(200, true, true, b"<html></html>");
        assert!(matches!(
            reply,
            Err(ChatError::Transport(TransportFailure::MalformedBody(_)))
        ));

        let reply = interpret(200, true, true, br#"{"status":"ok"}"#);
        assert_eq!(
            reply,
            Err(ChatError::Transport(TransportFailure::MalformedBody(
                "missing `response` field".to_owned()
            )))
        );
    }
}
