use std::any::type_name;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::timer::TimerState;
use crate::{Actor, ActorDeadError};

/// An event that an actor can handle.
///
/// Events are handled one at a time, in the order they were delivered,
/// so a handler always sees the state left by the previous one.
pub trait Event<S>: Send + 'static {
    /// Handles the event with mutable access to the actor's state.
    fn handle(self, state: &mut S, actor: &Actor<S>);
}

/// A type-erased event, ready to run against the state.
pub(crate) struct Job<S> {
    pub name: &'static str,
    run: Box<dyn FnOnce(&mut S, &Actor<S>) + Send>,
}

impl<S: 'static> Job<S> {
    pub fn new<E: Event<S>>(event: E) -> Self {
        Self {
            name: type_name::<E>(),
            run: Box::new(move |state, actor| event.handle(state, actor)),
        }
    }

    #[inline]
    pub fn run(self, state: &mut S, actor: &Actor<S>) {
        (self.run)(state, actor)
    }
}

/// What travels through the mailbox.
pub(crate) enum Envelope<S> {
    /// Handle as soon as possible.
    Now(Job<S>),
    /// Keep in the timer registry until `deadline`.
    Later {
        deadline: Instant,
        job: Job<S>,
        state: Arc<TimerState>,
    },
}

pub(crate) struct Mailbox<S> {
    envelope_tx: mpsc::UnboundedSender<Envelope<S>>,
    kill_tx: watch::Sender<bool>,
}

pub(crate) struct Inbox<S> {
    pub envelope_rx: mpsc::UnboundedReceiver<Envelope<S>>,
    pub kill_rx: watch::Receiver<bool>,
}

impl<S> Mailbox<S> {
    pub fn new() -> (Self, Inbox<S>) {
        let (envelope_tx, envelope_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        (
            Self {
                envelope_tx,
                kill_tx,
            },
            Inbox {
                envelope_rx,
                kill_rx,
            },
        )
    }

    #[inline]
    pub fn post(&self, envelope: Envelope<S>) -> Result<(), ActorDeadError> {
        self.envelope_tx.send(envelope).map_err(|_| ActorDeadError)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.envelope_tx.is_closed()
    }

    #[inline]
    pub fn kill(&self) {
        self.kill_tx.send_replace(true);
    }
}
