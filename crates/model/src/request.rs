use crate::LeadId;

/// A request for a reply, sent once per user submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
    /// The session the message belongs to.
    pub lead_id: LeadId,
}

/// A successful reply from the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatReply {
    /// The assistant's text.
    pub text: String,
}
