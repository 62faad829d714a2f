use std::fmt::{self, Debug, Display};
use std::time::Duration;

use leadchat_model::LeadId;
use reqwest::Url;

const DEFAULT_CHAT_PATH: &str = "chat";

/// Error returned when a backend cannot be configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL or the chat path does not form a valid URL.
    InvalidUrl(String),
    /// The HTTP client could not be created.
    Client(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl(reason) => {
                write!(f, "invalid backend url: {reason}")
            }
            ConfigError::Client(reason) => {
                write!(f, "cannot create http client: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Builder for [`HttpBackendConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpBackendConfigBuilder {
    base_url: String,
    chat_path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpBackendConfigBuilder {
    /// Creates a builder for a backend served under `base_url`.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: None,
            timeout: None,
        }
    }

    /// Sets the path of the chat endpoint, relative to the base URL.
    /// Defaults to `chat`.
    #[inline]
    pub fn with_chat_path<S: Into<String>>(mut self, chat_path: S) -> Self {
        self.chat_path = Some(chat_path.into());
        self
    }

    /// Sets a timeout for the whole request. Without it the transport
    /// default applies.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<HttpBackendConfig, ConfigError> {
        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|err| ConfigError::InvalidUrl(format!("{err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "{base_url} cannot be a base"
            )));
        }

        let chat_path = self.chat_path.as_deref().unwrap_or(DEFAULT_CHAT_PATH);
        // Joining a relative path keeps any prefix of the base URL.
        let endpoint = base_url
            .join(chat_path.trim_start_matches('/'))
            .map_err(|err| ConfigError::InvalidUrl(format!("{err}")))?;

        Ok(HttpBackendConfig {
            endpoint,
            timeout: self.timeout,
        })
    }
}

/// Configuration for [`crate::HttpBackend`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpBackendConfig {
    pub(crate) endpoint: Url,
    pub(crate) timeout: Option<Duration>,
}

impl HttpBackendConfig {
    /// Returns the URL a request for `lead_id` is posted to.
    pub fn chat_url(&self, lead_id: &LeadId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("lead_id", lead_id.as_str());
        url
    }
}

impl Debug for HttpBackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackendConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(raw: &str) -> LeadId {
        LeadId::parse(raw).unwrap()
    }

    #[test]
    fn test_chat_url() {
        let config = HttpBackendConfigBuilder::with_base_url(
            "http://localhost:5000",
        )
        .build()
        .unwrap();
        assert_eq!(
            config.chat_url(&lead("abc123")).as_str(),
            "http://localhost:5000/chat?lead_id=abc123"
        );
        assert_eq!(
            config.chat_url(&lead("a b&c")).as_str(),
            "http://localhost:5000/chat?lead_id=a+b%26c"
        );
    }

    #[test]
    fn test_prefixed_base_url() {
        let config =
            HttpBackendConfigBuilder::with_base_url("https://example.com/app")
                .with_chat_path("/api/chat")
                .build()
                .unwrap();
        assert_eq!(
            config.chat_url(&lead("7")).as_str(),
            "https://example.com/app/api/chat?lead_id=7"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpBackendConfigBuilder::with_base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));

        let err = HttpBackendConfigBuilder::with_base_url("mailto:x@y.z")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }
}
