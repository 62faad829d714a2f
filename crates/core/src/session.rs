//! Where the session identifier comes from.
//!
//! The identifier is looked up again for every request, so a host that
//! learns it late (or loses it) is picked up without rebuilding the view.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use leadchat_model::LeadId;
use serde_json::Value;

/// A place a session identifier can be read from.
///
/// Sources are queried on the view's task right before each request, so
/// a lookup must return quickly.
pub trait SessionSource: Send + Sync + 'static {
    /// Returns the identifier, or `None` if this source has none.
    fn lead_id(&self) -> Option<LeadId>;
}

/// State embedded by the host page: the identifier it was rendered for,
/// and optionally a greeting to open the conversation with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    lead_id: Option<LeadId>,
    greeting: Option<String>,
}

impl PageState {
    /// Sets the identifier. Blank values are ignored.
    #[inline]
    pub fn with_lead_id(mut self, lead_id: &str) -> Self {
        self.lead_id = LeadId::parse(lead_id);
        self
    }

    /// Sets the greeting. Blank values are ignored.
    #[inline]
    pub fn with_greeting(mut self, greeting: &str) -> Self {
        let greeting = greeting.trim();
        self.greeting = (!greeting.is_empty()).then(|| greeting.to_owned());
        self
    }

    /// Returns the greeting, if any.
    #[inline]
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }
}

impl SessionSource for PageState {
    #[inline]
    fn lead_id(&self) -> Option<LeadId> {
        self.lead_id.clone()
    }
}

/// Session-scoped storage backed by a JSON object file, read on every
/// lookup. The identifier is stored under the `lead_id` key.
///
/// A missing or unreadable file counts as an empty storage. The file is
/// read with blocking I/O on the view's task, once per request, so it
/// should stay small and local. Nothing is cached: a file written or
/// removed by the host takes effect on the next request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Creates a storage reading from `path`.
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_item(&self, key: &str) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no session storage at {}", self.path.display());
                return None;
            }
            Err(err) => {
                warn!(
                    "cannot read session storage {}: {err}",
                    self.path.display()
                );
                return None;
            }
        };
        let value = match serde_json::from_str::<Value>(&contents) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "malformed session storage {}: {err}",
                    self.path.display()
                );
                return None;
            }
        };
        value.get(key)?.as_str().map(ToOwned::to_owned)
    }
}

impl SessionSource for SessionStorage {
    fn lead_id(&self) -> Option<LeadId> {
        LeadId::parse(&self.get_item("lead_id")?)
    }
}

/// Sources consulted in order, the first identifier found wins.
#[derive(Default)]
pub(crate) struct SessionSources {
    sources: Vec<Box<dyn SessionSource>>,
}

impl SessionSources {
    #[inline]
    pub fn push(&mut self, source: Box<dyn SessionSource>) {
        self.sources.push(source);
    }

    pub fn lead_id(&self) -> Option<LeadId> {
        self.sources.iter().find_map(|source| source.lead_id())
    }
}
