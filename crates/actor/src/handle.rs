use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::Instrument;

use crate::mailbox::{Envelope, Job, Mailbox};
use crate::scheduler::run_actor;
use crate::{ActorDeadError, Event, Timer};

/// Handle to an actor.
///
/// The actor keeps running as long as a handle exists, or until it is
/// killed. Timers don't count as handles.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + 'static> Actor<S> {
    /// Spawns a new actor with the specified state and an optional label.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(state: S, label: Option<&str>) -> Self {
        let (mailbox, inbox) = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_actor(Arc::downgrade(&mailbox), state, inbox)
                .instrument(trace_span!("actor", label = label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    /// Sends an event to the actor.
    #[inline]
    pub fn send<E: Event<S>>(&self, event: E) -> Result<(), ActorDeadError> {
        self.mailbox.post(Envelope::Now(Job::new(event)))
    }

    /// Delivers an event to the actor after `delay`.
    ///
    /// The delivery is cancelled when the returned [`Timer`] is dropped.
    /// If the actor has already stopped, the timer never fires.
    pub fn send_after<E: Event<S>>(&self, delay: Duration, event: E) -> Timer {
        let (timer, state) = Timer::new();
        let envelope = Envelope::Later {
            deadline: Instant::now() + delay,
            job: Job::new(event),
            state,
        };
        if self.mailbox.post(envelope).is_err() {
            trace!("actor has stopped, the timer will never fire");
        }
        timer
    }

    /// Returns `true` if the actor has stopped handling events.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.mailbox.is_closed()
    }

    /// Asks the actor to stop.
    ///
    /// Events already queued are not handled, and pending timers are
    /// dropped.
    #[inline]
    pub fn try_kill(&self) {
        self.mailbox.kill();
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}
