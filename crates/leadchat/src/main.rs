//! A terminal front-end for the chat widget.
//!
//! Type a message and press enter to send it. End a line with `\` to
//! continue the message on the next line, and type `/clear` to clear the
//! conversation.

#[macro_use]
extern crate tracing;

use std::collections::HashSet;
use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use leadchat::WidgetBuilder;
use leadchat::core::{Key, MessageId, Phase, ViewSnapshot};
use leadchat_model::Role;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";
const CLEAR_COMMAND: &str = "/clear";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(base_url) = env::var("LEADCHAT_BASE_URL") else {
        eprintln!("LEADCHAT_BASE_URL environment variable is not set");
        return;
    };

    let mut builder = WidgetBuilder::with_base_url(base_url);
    if let Ok(lead_id) = env::var("LEADCHAT_LEAD_ID") {
        builder = builder.with_lead_id(&lead_id);
    }
    if let Ok(path) = env::var("LEADCHAT_SESSION_FILE") {
        builder = builder.with_session_file(path);
    }
    if let Ok(greeting) = env::var("LEADCHAT_GREETING") {
        builder = builder.with_greeting(&greeting);
    }

    let (navigate_tx, mut navigate_rx) = mpsc::unbounded_channel();
    let widget = match builder
        .on_navigate(move |target| {
            navigate_tx.send(target.to_owned()).ok();
        })
        .build()
    {
        Ok(widget) => widget,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut snapshots = widget.subscribe();
    let mut printer = Printer::default();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut draft = String::new();

    loop {
        if draft.is_empty() {
            let settled =
                render(&mut snapshots, &mut printer, &mut navigate_rx).await;
            if !settled {
                break;
            }
            print!("> ");
        } else {
            print!(". ");
        }
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };

        if draft.is_empty() && line.trim() == CLEAR_COMMAND {
            widget.clear();
            continue;
        }

        // A trailing backslash stands for Shift+Enter.
        if let Some(part) = line.strip_suffix('\\') {
            draft.push_str(part);
            widget.set_input(draft.clone());
            widget.press_key(Key::ShiftEnter);
            draft.push('\n');
            continue;
        }

        draft.push_str(&line);
        widget.set_input(std::mem::take(&mut draft));
        widget.press_key(Key::Enter);
    }
}

/// Draws the widget until nothing is left to happen. Returns `false` if the
/// widget navigated away or stopped.
async fn render(
    snapshots: &mut watch::Receiver<ViewSnapshot>,
    printer: &mut Printer,
    navigate_rx: &mut mpsc::UnboundedReceiver<String>,
) -> bool {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar: Option<ProgressBar> = None;

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        printer.print(&snapshot, &mut progress_bar);

        // A pending redirect is waited for, the prompt makes no sense
        // anymore.
        if snapshot.is_settled() && snapshot.redirect.is_none() {
            finish_progress(&mut progress_bar);
            return true;
        }

        if snapshot.typing && !printer.is_mid_line() {
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("💬 Typing...");
                    progress_bar
                })
                .inc(1);
        }

        let sleep = sleep(Duration::from_millis(100));
        select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    finish_progress(&mut progress_bar);
                    return false;
                }
            },
            target = navigate_rx.recv() => {
                finish_progress(&mut progress_bar);
                if let Some(target) = target {
                    println!("{}", format!("↪ Redirecting to {target}").dimmed());
                }
                return false;
            },
            _ = sleep => {}
        }
    }
}

fn finish_progress(progress_bar: &mut Option<ProgressBar>) {
    if let Some(progress_bar) = progress_bar.take() {
        progress_bar.finish_and_clear();
    }
}

/// Prints assistant messages as they are revealed, one at a time and in
/// order.
#[derive(Default)]
struct Printer {
    printed: HashSet<MessageId>,
    // The message being revealed and how many characters are on screen.
    current: Option<(MessageId, usize)>,
    clearing: bool,
}

impl Printer {
    fn print(
        &mut self,
        snapshot: &ViewSnapshot,
        progress_bar: &mut Option<ProgressBar>,
    ) {
        let mut out = String::new();

        if snapshot.clearing && !self.clearing {
            if self.current.take().is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", "Conversation cleared.".dimmed()));
        }
        self.clearing = snapshot.clearing;

        for message in &snapshot.messages {
            if message.phase == Phase::Leaving
                || self.printed.contains(&message.id)
            {
                continue;
            }
            // Users see what they typed already.
            if message.role == Role::User {
                self.printed.insert(message.id);
                continue;
            }

            let on_screen = match self.current {
                Some((id, count)) if id == message.id => count,
                current => {
                    if current.is_some() {
                        out.push('\n');
                    }
                    if message.is_error {
                        out.push_str(&format!("{}⚠️  ", BAR_CHAR.bright_red()));
                    } else {
                        out.push_str(&format!("{}🤖 ", BAR_CHAR.bright_cyan()));
                    }
                    0
                }
            };

            let chunk: String =
                message.visible_text().chars().skip(on_screen).collect();
            if message.is_error {
                out.push_str(&format!("{}", chunk.red()));
            } else {
                out.push_str(&format!("{}", chunk.bright_white()));
            }

            if message.is_revealing() {
                // Later messages wait for this one.
                self.current = Some((message.id, message.visible));
                break;
            }
            out.push('\n');
            self.current = None;
            self.printed.insert(message.id);
        }

        if out.is_empty() {
            return;
        }
        // Finish the progress bar before printing anything else.
        finish_progress(progress_bar);
        print!("{out}");
        std::io::stdout().flush().ok();
    }

    #[inline]
    fn is_mid_line(&self) -> bool {
        self.current.is_some()
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
