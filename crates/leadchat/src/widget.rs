use std::path::PathBuf;
use std::time::Duration;

use leadchat_core::session::{PageState, SessionStorage};
use leadchat_core::{ChatView, ChatViewBuilder, Key, ViewSnapshot};
use leadchat_http_backend::{
    ConfigError, HttpBackend, HttpBackendConfigBuilder,
};
use tokio::sync::watch;

type NavigateFn = Box<dyn Fn(&str) + Send + Sync>;

/// A widget builder.
///
/// See [`Widget`].
pub struct WidgetBuilder {
    config_builder: HttpBackendConfigBuilder,
    page: PageState,
    session_file: Option<PathBuf>,
    welcome: Option<String>,
    landing_path: Option<String>,
    on_navigate: Option<NavigateFn>,
}

impl WidgetBuilder {
    /// Creates a widget builder that talks to the backend at `base_url`.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            config_builder: HttpBackendConfigBuilder::with_base_url(base_url),
            page: PageState::default(),
            session_file: None,
            welcome: None,
            landing_path: None,
            on_navigate: None,
        }
    }

    /// Sets the path of the chat endpoint, relative to the base URL.
    #[inline]
    pub fn with_chat_path<S: Into<String>>(mut self, chat_path: S) -> Self {
        self.config_builder = self.config_builder.with_chat_path(chat_path);
        self
    }

    /// Sets the lead id embedded by the host page.
    #[inline]
    pub fn with_lead_id(mut self, lead_id: &str) -> Self {
        self.page = self.page.with_lead_id(lead_id);
        self
    }

    /// Sets the greeting to open the conversation with.
    #[inline]
    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.page = self.page.with_greeting(greeting);
        self
    }

    /// Sets a JSON file to look the lead id up in when the host page has
    /// none.
    #[inline]
    pub fn with_session_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Sets the message shown after the conversation is cleared.
    #[inline]
    pub fn with_welcome<S: Into<String>>(mut self, welcome: S) -> Self {
        self.welcome = Some(welcome.into());
        self
    }

    /// Sets where to go when the session turns out to be missing.
    #[inline]
    pub fn with_landing_path<S: Into<String>>(mut self, path: S) -> Self {
        self.landing_path = Some(path.into());
        self
    }

    /// Sets the timeout of every request to the backend.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.with_timeout(timeout);
        self
    }

    /// Attaches a callback to be invoked when the widget wants to navigate
    /// away.
    #[inline]
    pub fn on_navigate(
        mut self,
        on_navigate: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_navigate = Some(Box::new(on_navigate));
        self
    }

    /// Builds a new widget. Must be called within a Tokio runtime.
    pub fn build(self) -> Result<Widget, ConfigError> {
        let config = self.config_builder.build()?;
        debug!("chat backend: {config:?}");
        let backend = HttpBackend::new(config)?;

        let mut view_builder =
            ChatViewBuilder::with_backend(backend).with_page_state(self.page);
        if let Some(path) = self.session_file {
            view_builder =
                view_builder.with_session_storage(SessionStorage::new(path));
        }
        if let Some(welcome) = self.welcome {
            view_builder = view_builder.with_welcome(welcome);
        }
        if let Some(path) = self.landing_path {
            view_builder = view_builder.with_landing_path(path);
        }
        if let Some(on_navigate) = self.on_navigate {
            view_builder = view_builder.on_navigate(on_navigate);
        }

        Ok(Widget {
            view: view_builder.build(),
        })
    }
}

/// A chat widget, like a window that displays messages and has an input
/// box.
///
/// The widget holds a chat view wired to the HTTP backend, and it is
/// basically a wrapper around [`ChatView`].
pub struct Widget {
    view: ChatView,
}

impl Widget {
    /// Sends a message, as if it had been typed and submitted.
    #[inline]
    pub fn send_message(&self, message: &str) {
        self.view.submit_message(message);
    }

    /// Replaces the content of the input box.
    #[inline]
    pub fn set_input<S: Into<String>>(&self, text: S) {
        self.view.set_input(text);
    }

    /// Handles a key press in the input box.
    #[inline]
    pub fn press_key(&self, key: Key) {
        self.view.press_key(key);
    }

    /// Clears the conversation.
    #[inline]
    pub fn clear(&self) {
        self.view.clear_transcript();
    }

    /// Returns a receiver that observes every change of the widget.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.view.subscribe()
    }

    /// Returns the underlying chat view.
    #[inline]
    pub fn view(&self) -> &ChatView {
        &self.view
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.view.close();
    }
}
