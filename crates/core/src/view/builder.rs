use leadchat_model::ChatBackend;

use super::{ChatView, NavigateFn};
use crate::backend_client::BackendClient;
use crate::session::{PageState, SessionSource, SessionStorage};

const DEFAULT_WELCOME: &str =
    "Hello! I'm your sales assistant. How can I help you today?";
const DEFAULT_LANDING_PATH: &str = "/";

/// [`ChatView`] builder.
pub struct ChatViewBuilder {
    pub(super) backend: BackendClient,
    pub(super) page: Option<PageState>,
    pub(super) sources: Vec<Box<dyn SessionSource>>,
    pub(super) welcome: String,
    pub(super) landing_path: String,
    pub(super) on_navigate: Option<NavigateFn>,
}

impl ChatViewBuilder {
    /// Creates a new builder with the specified backend.
    #[inline]
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        Self {
            backend: BackendClient::new(backend),
            page: None,
            sources: vec![],
            welcome: DEFAULT_WELCOME.to_owned(),
            landing_path: DEFAULT_LANDING_PATH.to_owned(),
            on_navigate: None,
        }
    }

    /// Sets the state embedded by the host page. Its session identifier
    /// is preferred over every other source, and its greeting replaces
    /// the welcome message when the view opens.
    #[inline]
    pub fn with_page_state(mut self, page: PageState) -> Self {
        self.page = Some(page);
        self
    }

    /// Adds session-scoped storage as a source of the session identifier.
    #[inline]
    pub fn with_session_storage(self, storage: SessionStorage) -> Self {
        self.with_session_source(storage)
    }

    /// Adds a source of the session identifier. Sources are consulted in
    /// the order they were added, after the page state.
    #[inline]
    pub fn with_session_source<S: SessionSource>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Sets the message shown after the transcript is cleared, and when
    /// the view opens without a greeting from the page.
    #[inline]
    pub fn with_welcome<S: Into<String>>(mut self, welcome: S) -> Self {
        self.welcome = welcome.into();
        self
    }

    /// Sets where to go when the session turns out to be missing.
    /// Defaults to `/`.
    #[inline]
    pub fn with_landing_path<S: Into<String>>(mut self, path: S) -> Self {
        self.landing_path = path.into();
        self
    }

    /// Attaches a callback to be invoked when the view wants to navigate
    /// away.
    #[inline]
    pub fn on_navigate(
        mut self,
        on_navigate: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_navigate = Some(Box::new(on_navigate));
        self
    }

    /// Builds the view. Must be called within a Tokio runtime.
    #[inline]
    pub fn build(self) -> ChatView {
        ChatView::spawn_from_builder(self)
    }
}
