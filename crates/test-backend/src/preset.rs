use std::time::Duration;

use leadchat_model::{ChatError, ChatReply, TransportFailure};
use serde::{Deserialize, Serialize};

/// How a scripted request ends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "reply")]
    Reply(String),
    #[serde(rename = "application_error")]
    ApplicationError(String),
    #[serde(rename = "status")]
    Status { code: u16, reason: Option<String> },
    #[serde(rename = "unreachable")]
    Unreachable,
}

impl PresetOutcome {
    #[inline]
    pub(crate) fn into_result(self) -> Result<ChatReply, ChatError> {
        match self {
            PresetOutcome::Reply(text) => Ok(ChatReply { text }),
            PresetOutcome::ApplicationError(message) => {
                Err(ChatError::Application(message))
            }
            PresetOutcome::Status { code, reason } => {
                Err(TransportFailure::Status { code, reason }.into())
            }
            PresetOutcome::Unreachable => Err(TransportFailure::Unreachable(
                "connection refused".to_owned(),
            )
            .into()),
        }
    }
}

/// The preset answer for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The outcome of the request.
    pub outcome: PresetOutcome,
    /// Overrides the backend-wide delay for this request.
    #[serde(default, with = "millis")]
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// A successful reply with `text`.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self::with_outcome(PresetOutcome::Reply(text.into()))
    }

    /// A request that ends with `outcome`.
    #[inline]
    pub fn with_outcome(outcome: PresetOutcome) -> Self {
        Self {
            outcome,
            delay: None,
        }
    }

    /// Sets how long the request takes.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.map(|d| d.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
