mod builder;
mod state;

use std::collections::{HashMap, VecDeque};

use leadchat_actor::{Actor, Event, Timer};
use leadchat_model::Transcript;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use builder::ChatViewBuilder;
use state::{
    ClearTranscript, PressKey, SetInput, ShowGreeting, Stage, Submit,
    SubmitMessage,
};

use crate::backend_client::BackendClient;
use crate::display::{Entry, ViewSnapshot};
use crate::session::SessionSources;

type NavigateFn = Box<dyn Fn(&str) + Send + Sync>;

/// Keys that mean something to the input control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Submits the input, unless it is blank.
    Enter,
    /// Inserts a line break into the input.
    ShiftEnter,
}

/// State of a chat view. Only ever touched by the view's actor.
struct ChatViewState {
    backend: BackendClient,
    sessions: SessionSources,
    welcome: String,
    landing_path: String,
    on_navigate: Option<NavigateFn>,
    snapshot_tx: watch::Sender<ViewSnapshot>,

    transcript: Transcript,
    // Display state, one entry per transcript message in the same order.
    entries: Vec<Entry>,
    next_message_id: u64,
    input: String,

    current_stage: Stage,
    pending_inputs: VecDeque<String>,
    clear_generation: u64,
    clearing: Option<Timer>,
    redirect: Option<(String, Timer)>,
    scroll_seq: u64,

    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,
}

/// A chat view controller.
///
/// The view owns the transcript and the input control, sends each
/// submission to the backend and animates the replies. Rendering layers
/// observe it through [`ChatView::subscribe`] and feed user actions back
/// through the other methods.
///
/// Every action is handled in the order it was made. Submissions made
/// while a request is outstanding are shown immediately but sent only
/// after the outstanding request has finished.
#[derive(Clone)]
pub struct ChatView {
    actor: Actor<ChatViewState>,
    snapshot_rx: watch::Receiver<ViewSnapshot>,
}

impl ChatView {
    /// Submits `text` as a user message. Blank texts are ignored.
    #[inline]
    pub fn submit_message<S: Into<String>>(&self, text: S) {
        self.send(SubmitMessage(text.into()));
    }

    /// Submits the current content of the input control.
    #[inline]
    pub fn submit(&self) {
        self.send(Submit);
    }

    /// Replaces the content of the input control.
    #[inline]
    pub fn set_input<S: Into<String>>(&self, text: S) {
        self.send(SetInput(text.into()));
    }

    /// Handles a key press in the input control.
    #[inline]
    pub fn press_key(&self, key: Key) {
        self.send(PressKey(key));
    }

    /// Fades out every message, then shows the welcome message again.
    #[inline]
    pub fn clear_transcript(&self) {
        self.send(ClearTranscript);
    }

    /// Returns a receiver that observes every change of the view.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Returns the current state of the view.
    #[inline]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Stops the view. Pending animations and redirects are dropped.
    #[inline]
    pub fn close(&self) {
        self.actor.try_kill();
    }

    fn send<E: Event<ChatViewState> + 'static>(&self, event: E) {
        if self.actor.send(event).is_err() {
            warn!("chat view has stopped, dropping the action");
        }
    }
}

impl ChatView {
    fn spawn_from_builder(builder: ChatViewBuilder) -> Self {
        let ChatViewBuilder {
            backend,
            page,
            sources,
            welcome,
            landing_path,
            on_navigate,
        } = builder;

        let greeting = page
            .as_ref()
            .and_then(|page| page.greeting())
            .unwrap_or(welcome.as_str())
            .to_owned();

        let mut sessions = SessionSources::default();
        if let Some(page) = page {
            sessions.push(Box::new(page));
        }
        for source in sources {
            sessions.push(source);
        }

        let (snapshot_tx, snapshot_rx) = watch::channel(ViewSnapshot::default());
        let state = ChatViewState {
            backend,
            sessions,
            welcome,
            landing_path,
            on_navigate,
            snapshot_tx,
            transcript: Default::default(),
            entries: Default::default(),
            next_message_id: 1,
            input: Default::default(),
            current_stage: Default::default(),
            pending_inputs: Default::default(),
            clear_generation: 0,
            clearing: None,
            redirect: None,
            scroll_seq: 0,
            running_tasks: Default::default(),
            next_task_id: 1,
        };
        let view = Self {
            actor: Actor::spawn(state, Some("chat view")),
            snapshot_rx,
        };
        view.send(ShowGreeting(greeting));
        view
    }
}
