use std::error::Error;
use std::fmt;

/// The reason why a request for a reply has failed.
///
/// The variant is decided where the failure happens, so callers never
/// have to guess the cause from the message text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChatError {
    /// No session identifier was available, the request was never sent.
    MissingSession,
    /// The backend could not be reached, or answered with something
    /// other than a usable reply.
    Transport(TransportFailure),
    /// The backend answered successfully but flagged an error.
    Application(String),
}

/// Failures below the application level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransportFailure {
    /// The request did not complete (connection refused, TLS, body read).
    Unreachable(String),
    /// The backend answered with a non-success status code.
    Status {
        /// The HTTP status code.
        code: u16,
        /// The `error` field of the body, if the body carried one.
        reason: Option<String>,
    },
    /// The body of a successful response could not be understood.
    MalformedBody(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::MissingSession => "missing lead id".fmt(f),
            ChatError::Transport(failure) => failure.fmt(f),
            ChatError::Application(message) => {
                write!(f, "backend reported an error: {message}")
            }
        }
    }
}

impl Error for ChatError {}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Unreachable(detail) => {
                write!(f, "backend unreachable: {detail}")
            }
            TransportFailure::Status { code, reason: None } => {
                write!(f, "HTTP error, status {code}")
            }
            TransportFailure::Status {
                code,
                reason: Some(reason),
            } => {
                write!(f, "HTTP error, status {code}: {reason}")
            }
            TransportFailure::MalformedBody(detail) => {
                write!(f, "malformed response body: {detail}")
            }
        }
    }
}

impl From<TransportFailure> for ChatError {
    #[inline]
    fn from(failure: TransportFailure) -> Self {
        ChatError::Transport(failure)
    }
}
