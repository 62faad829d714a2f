use leadchat_actor::{Actor, Event};
use leadchat_model::{ChatError, ChatReply, ChatRequest, Message};

use super::{ChatViewState, Key};
use crate::animation::{
    ENTER_DELAY, FADE_OUT, REDIRECT_DELAY, WELCOME_DELAY, char_delay,
};
use crate::display::{self, Entry, MessageId, Phase, ViewSnapshot};
use crate::notice;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) enum Stage {
    #[default]
    Idle,
    AwaitingReply,
}

/// How a new message shows up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Appearance {
    /// All at once.
    Instant,
    /// All at once, sliding in after a short delay.
    Enter,
    /// One character at a time.
    Reveal,
}

impl ChatViewState {
    fn submit_message(&mut self, text: &str, handle: &Actor<Self>) {
        let text = text.trim();
        if text.is_empty() {
            trace!("ignoring a blank submission");
            return;
        }
        let text = text.to_owned();

        // The user's message shows up before anything is sent.
        self.append(Message::user(text.clone()), Appearance::Enter, false, handle);
        self.input.clear();

        if self.current_stage != Stage::Idle {
            // The outstanding request will pick this up when it ends.
            debug!("a request is outstanding, queueing the submission");
            self.pending_inputs.push_back(text);
            return;
        }
        self.dispatch(text, handle);
    }

    fn process_next_input(&mut self, handle: &Actor<Self>) {
        if self.current_stage != Stage::Idle {
            return;
        }
        if let Some(input) = self.pending_inputs.pop_front() {
            self.dispatch(input, handle);
        }
    }

    /// Sends the message, assuming the stage is checked.
    fn dispatch(&mut self, message: String, handle: &Actor<Self>) {
        let Some(lead_id) = self.sessions.lead_id() else {
            warn!("no lead id available, the message is not sent");
            self.finish_request(Err(ChatError::MissingSession), handle);
            return;
        };
        self.current_stage = Stage::AwaitingReply;
        self.request_scroll();

        let request = ChatRequest { message, lead_id };
        let backend = self.backend.clone();
        let handle_clone = handle.clone();
        self.spawn_task(
            |task_id| async move {
                trace!("request task {task_id} started");
                let result = backend.send_message(request).await;
                handle_clone
                    .send(RequestFinished(result))
                    .ok();
            },
            handle,
        );
    }

    fn finish_request(
        &mut self,
        result: Result<ChatReply, ChatError>,
        handle: &Actor<Self>,
    ) {
        self.current_stage = Stage::Idle;
        match result {
            Ok(reply) => {
                self.append(
                    Message::assistant(reply.text),
                    Appearance::Reveal,
                    false,
                    handle,
                );
            }
            Err(err) => {
                error!("error sending message: {err}");
                if err == ChatError::MissingSession {
                    self.schedule_redirect(handle);
                }
                self.append(
                    Message::assistant(notice::describe(&err)),
                    Appearance::Instant,
                    true,
                    handle,
                );
            }
        }
        self.process_next_input(handle);
    }

    fn schedule_redirect(&mut self, handle: &Actor<Self>) {
        if self.redirect.is_some() {
            debug!("a redirect is already scheduled");
            return;
        }
        let target = self.landing_path.clone();
        info!("redirecting to {target} in {REDIRECT_DELAY:?}");
        let timer = handle.send_after(REDIRECT_DELAY, Navigate);
        self.redirect = Some((target, timer));
    }

    fn append(
        &mut self,
        message: Message,
        appearance: Appearance,
        is_error: bool,
        handle: &Actor<Self>,
    ) {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;

        let len = message.text.chars().count();
        let mut entry = Entry {
            id,
            len,
            visible: len,
            phase: Phase::Shown,
            is_error,
            animation: None,
        };
        match appearance {
            Appearance::Instant => {}
            Appearance::Enter => {
                entry.phase = Phase::Entering;
                entry.animation =
                    Some(handle.send_after(ENTER_DELAY, EnterFinished(id)));
            }
            Appearance::Reveal => {
                // The first character is shown right away.
                entry.visible = len.min(1);
                if entry.visible < len {
                    entry.animation = Some(
                        handle.send_after(char_delay(len), RevealTick(id)),
                    );
                }
            }
        }

        self.transcript.push(message);
        self.entries.push(entry);
        self.request_scroll();
    }

    fn reveal_next_char(&mut self, id: MessageId, handle: &Actor<Self>) {
        let Some(entry) = self.entry_mut(id) else {
            trace!("message {id:?} is gone, dropping the tick");
            return;
        };
        if entry.phase == Phase::Leaving || entry.visible >= entry.len {
            entry.animation = None;
            return;
        }

        entry.visible += 1;
        let len = entry.len;
        entry.animation = (entry.visible < len)
            .then(|| handle.send_after(char_delay(len), RevealTick(id)));
        self.request_scroll();
    }

    fn finish_enter(&mut self, id: MessageId) {
        let Some(entry) = self.entry_mut(id) else {
            return;
        };
        entry.animation = None;
        if entry.phase == Phase::Entering {
            entry.phase = Phase::Shown;
        }
    }

    fn clear_transcript(&mut self, handle: &Actor<Self>) {
        debug!("clearing {} messages", self.entries.len());
        self.clear_generation += 1;
        for entry in &mut self.entries {
            entry.phase = Phase::Leaving;
            // Dropping the timer stops a running reveal.
            entry.animation = None;
        }
        // Replacing the timer cancels a clear that is still in progress.
        self.clearing = Some(
            handle.send_after(FADE_OUT, FadeOutFinished(self.clear_generation)),
        );
    }

    fn finish_fade_out(&mut self, generation: u64, handle: &Actor<Self>) {
        if generation != self.clear_generation {
            return;
        }
        // Leaving messages always precede the ones added since the clear.
        let count = self
            .entries
            .iter()
            .take_while(|entry| entry.phase == Phase::Leaving)
            .count();
        self.entries.drain(..count);
        self.transcript.drain_front(count);
        trace!("removed {count} messages");

        self.clearing =
            Some(handle.send_after(WELCOME_DELAY, WelcomeDue(generation)));
    }

    fn show_welcome(&mut self, generation: u64, handle: &Actor<Self>) {
        if generation != self.clear_generation {
            return;
        }
        self.clearing = None;
        let welcome = self.welcome.clone();
        self.append(
            Message::assistant(welcome),
            Appearance::Reveal,
            false,
            handle,
        );
    }

    fn press_key(&mut self, key: Key, handle: &Actor<Self>) {
        match key {
            Key::Enter => {
                if self.input.trim().is_empty() {
                    return;
                }
                let input = self.input.clone();
                self.submit_message(&input, handle);
            }
            Key::ShiftEnter => self.input.push('\n'),
        }
    }

    #[inline]
    fn entry_mut(&mut self, id: MessageId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    #[inline]
    fn request_scroll(&mut self) {
        self.scroll_seq += 1;
    }

    fn publish(&self) {
        let snapshot = ViewSnapshot {
            messages: display::project(&self.transcript, &self.entries),
            typing: self.current_stage == Stage::AwaitingReply,
            queued: self.pending_inputs.len(),
            clearing: self.clearing.is_some(),
            input: self.input.clone(),
            send_enabled: !self.input.trim().is_empty(),
            scroll_seq: self.scroll_seq,
            redirect: self.redirect.as_ref().map(|(target, _)| target.clone()),
        };
        self.snapshot_tx.send_replace(snapshot);
    }

    fn spawn_task<F, Fut>(&mut self, f: F, handle: &Actor<Self>)
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let handle = handle.clone();
        let fut = f(task_id);
        let task = tokio::spawn(async move {
            fut.await;
            handle.send(TaskEnded(task_id)).ok();
        });
        self.running_tasks.insert(task_id, task);
    }
}

// -------------------------------
// Events sent by the `ChatView` handle
// -------------------------------

#[derive(Debug)]
pub(super) struct ShowGreeting(pub String);

impl Event<ChatViewState> for ShowGreeting {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.append(
            Message::assistant(self.0),
            Appearance::Reveal,
            false,
            handle,
        );
        state.publish();
    }
}

#[derive(Debug)]
pub(super) struct SubmitMessage(pub String);

impl Event<ChatViewState> for SubmitMessage {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.submit_message(&self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
pub(super) struct Submit;

impl Event<ChatViewState> for Submit {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        let input = state.input.clone();
        state.submit_message(&input, handle);
        state.publish();
    }
}

#[derive(Debug)]
pub(super) struct SetInput(pub String);

impl Event<ChatViewState> for SetInput {
    fn handle(self, state: &mut ChatViewState, _handle: &Actor<ChatViewState>) {
        state.input = self.0;
        state.publish();
    }
}

#[derive(Debug)]
pub(super) struct PressKey(pub Key);

impl Event<ChatViewState> for PressKey {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.press_key(self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
pub(super) struct ClearTranscript;

impl Event<ChatViewState> for ClearTranscript {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.clear_transcript(handle);
        state.publish();
    }
}

// ---------------
// Internal events
// ---------------

#[derive(Debug)]
struct EnterFinished(MessageId);

impl Event<ChatViewState> for EnterFinished {
    fn handle(self, state: &mut ChatViewState, _handle: &Actor<ChatViewState>) {
        state.finish_enter(self.0);
        state.publish();
    }
}

#[derive(Debug)]
struct RevealTick(MessageId);

impl Event<ChatViewState> for RevealTick {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.reveal_next_char(self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
struct FadeOutFinished(u64);

impl Event<ChatViewState> for FadeOutFinished {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.finish_fade_out(self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
struct WelcomeDue(u64);

impl Event<ChatViewState> for WelcomeDue {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.show_welcome(self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
struct Navigate;

impl Event<ChatViewState> for Navigate {
    fn handle(self, state: &mut ChatViewState, _handle: &Actor<ChatViewState>) {
        let Some((target, _timer)) = state.redirect.take() else {
            return;
        };
        info!("navigating to {target}");
        if let Some(on_navigate) = &state.on_navigate {
            on_navigate(&target);
        }
        state.publish();
    }
}

#[derive(Debug)]
struct RequestFinished(Result<ChatReply, ChatError>);

impl Event<ChatViewState> for RequestFinished {
    fn handle(self, state: &mut ChatViewState, handle: &Actor<ChatViewState>) {
        state.finish_request(self.0, handle);
        state.publish();
    }
}

#[derive(Debug)]
struct TaskEnded(u64);

impl Event<ChatViewState> for TaskEnded {
    #[inline]
    fn handle(self, state: &mut ChatViewState, _handle: &Actor<ChatViewState>) {
        if state.running_tasks.remove(&self.0).is_none() {
            warn!("task {} ended but was never tracked", self.0);
        }
    }
}
