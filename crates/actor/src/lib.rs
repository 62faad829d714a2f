//! A lightweight single-task actor runtime with cancellable timers.
//!
//! Every event an actor receives is handled on the actor's own task, one
//! after another. Work that has to wait (a network call, an animation
//! tick) is done elsewhere and posts an event back when it is ready, so
//! the state is only ever touched by one handler at a time.
//!
//! Delayed events are kept by the actor loop itself. A [`Timer`] that is
//! dropped before its deadline, or whose actor stops, never delivers.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;
mod timer;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Event;
pub use timer::Timer;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio::time::sleep;

    use super::*;

    #[derive(Default)]
    struct Log {
        entries: Vec<&'static str>,
        pending: Vec<Timer>,
    }

    struct Push(&'static str);

    impl Event<Log> for Push {
        fn handle(self, state: &mut Log, _actor: &Actor<Log>) {
            state.entries.push(self.0);
        }
    }

    struct Get(oneshot::Sender<Vec<&'static str>>);

    impl Event<Log> for Get {
        fn handle(self, state: &mut Log, _actor: &Actor<Log>) {
            self.0.send(state.entries.clone()).unwrap();
        }
    }

    struct PushLater(&'static str, Duration);

    impl Event<Log> for PushLater {
        fn handle(self, state: &mut Log, actor: &Actor<Log>) {
            let timer = actor.send_after(self.1, Push(self.0));
            state.pending.push(timer);
        }
    }

    struct DropPending;

    impl Event<Log> for DropPending {
        fn handle(self, state: &mut Log, _actor: &Actor<Log>) {
            state.pending.clear();
        }
    }

    async fn entries(actor: &Actor<Log>) -> Vec<&'static str> {
        let (tx, rx) = oneshot::channel();
        actor.send(Get(tx)).unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_send_event() {
        let actor = Actor::spawn(Log::default(), None);
        actor.send(Push("a")).unwrap();
        actor.send(Push("b")).unwrap();
        assert_eq!(entries(&actor).await, ["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after() {
        let actor = Actor::spawn(Log::default(), Some("log"));
        let timer = actor.send_after(Duration::from_millis(300), Push("late"));

        sleep(Duration::from_millis(299)).await;
        assert!(entries(&actor).await.is_empty());
        assert!(!timer.has_fired());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(entries(&actor).await, ["late"]);
        assert!(timer.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_order() {
        let actor = Actor::spawn(Log::default(), None);
        let _timers = [
            actor.send_after(Duration::from_millis(30), Push("third")),
            actor.send_after(Duration::from_millis(10), Push("first")),
            actor.send_after(Duration::from_millis(20), Push("second")),
            actor.send_after(Duration::from_millis(20), Push("second again")),
        ];

        sleep(Duration::from_millis(50)).await;
        assert_eq!(
            entries(&actor).await,
            ["first", "second", "second again", "third"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_timer() {
        let actor = Actor::spawn(Log::default(), None);
        let timer = actor.send_after(Duration::from_millis(50), Push("handle"));
        timer.cancel();

        // Timers kept in the state are cancelled when the state lets go
        // of them.
        actor
            .send(PushLater("state", Duration::from_millis(50)))
            .unwrap();
        actor.send(DropPending).unwrap();

        sleep(Duration::from_millis(100)).await;
        assert!(entries(&actor).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill() {
        let actor = Actor::spawn(Log::default(), None);
        let timer = actor.send_after(Duration::from_millis(50), Push("never"));
        actor.try_kill();
        sleep(Duration::from_millis(100)).await;

        assert!(actor.is_dead());
        assert!(!timer.has_fired());
        assert_eq!(actor.send(Push("late")), Err(ActorDeadError));
    }
}
