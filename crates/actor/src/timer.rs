use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared between a [`Timer`] and the actor loop that owns its event.
pub(crate) struct TimerState(AtomicU8);

impl TimerState {
    /// Marks the timer as fired. Returns `false` if it was cancelled
    /// first, in which case the event must not be handled.
    #[inline]
    pub fn fire(&self) -> bool {
        self.0
            .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    fn cancel(&self) {
        self.0
            .compare_exchange(
                PENDING,
                CANCELLED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok();
    }

    #[inline]
    fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }
}

/// A pending delayed delivery created by [`crate::Actor::send_after`].
///
/// The event waits in the actor's own timer registry and is handled on
/// the actor's task like any other event. Dropping the timer cancels the
/// delivery: once the drop returns, the event is never handled, even if
/// its deadline has already passed. Pending timers die with the actor.
pub struct Timer {
    state: Arc<TimerState>,
}

impl Timer {
    #[inline]
    pub(crate) fn new() -> (Self, Arc<TimerState>) {
        let state = Arc::new(TimerState(AtomicU8::new(PENDING)));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    /// Cancels the delivery. Equivalent to dropping the timer.
    #[inline]
    pub fn cancel(self) {}

    /// Returns `true` once the event has been handed to the actor.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.state.get() == FIRED
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.state.cancel();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.get() {
            PENDING => "pending",
            FIRED => "fired",
            _ => "cancelled",
        };
        f.debug_tuple("Timer").field(&state).finish()
    }
}
