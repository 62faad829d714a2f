use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use tokio::select;
use tokio::time::{Instant, sleep_until};

use crate::Actor;
use crate::mailbox::{Envelope, Inbox, Job, Mailbox};
use crate::timer::TimerState;

struct Scheduled<S> {
    job: Job<S>,
    state: Arc<TimerState>,
}

/// Timers owned by the actor loop, earliest deadline first. The sequence
/// number keeps timers with the same deadline in scheduling order.
struct TimerRegistry<S> {
    entries: BTreeMap<(Instant, u64), Scheduled<S>>,
    next_seq: u64,
}

impl<S> TimerRegistry<S> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    fn insert(&mut self, deadline: Instant, scheduled: Scheduled<S>) {
        self.entries.insert((deadline, self.next_seq), scheduled);
        self.next_seq += 1;
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.entries.first_key_value().map(|(&(deadline, _), _)| deadline)
    }

    /// Takes the earliest due job whose timer is still alive.
    fn pop_due(&mut self, now: Instant) -> Option<Job<S>> {
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                return None;
            }
            let Scheduled { job, state } = entry.remove();
            if state.fire() {
                return Some(job);
            }
            trace!("skipping cancelled timer: {}", job.name);
        }
        None
    }
}

pub(crate) async fn run_actor<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    inbox: Inbox<S>,
) {
    let Inbox {
        mut envelope_rx,
        mut kill_rx,
    } = inbox;
    let mut timers = TimerRegistry::new();

    debug!("started");
    loop {
        let next_deadline = timers.next_deadline();
        let job = select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            envelope = envelope_rx.recv() => {
                match envelope {
                    Some(Envelope::Now(job)) => job,
                    Some(Envelope::Later { deadline, job, state: timer }) => {
                        timers.insert(deadline, Scheduled { job, state: timer });
                        continue;
                    }
                    None => break,
                }
            }
            _ = sleep_until(next_deadline.unwrap_or_else(Instant::now)),
                if next_deadline.is_some() =>
            {
                let Some(job) = timers.pop_due(Instant::now()) else {
                    continue;
                };
                job
            }
        };
        trace!("received event: {}", job.name);

        let Some(mailbox) = mailbox.upgrade() else {
            debug!("last handle has been dropped, discard the event");
            break;
        };
        trace_span!("proc event", event = job.name).in_scope(|| {
            job.run(&mut state, &Actor::from_mailbox(mailbox));
        });
    }

    if !timers.entries.is_empty() {
        debug!("dropping {} pending timers", timers.entries.len());
    }
    debug!("will terminate");
}
