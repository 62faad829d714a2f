//! The chat view controller: transcript, input handling, request
//! sequencing and the animations around them.
//!
//! Nothing in this crate draws anything. A rendering layer subscribes to
//! [`ViewSnapshot`]s and forwards user actions to the [`ChatView`].

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod animation;
mod backend_client;
mod display;
pub mod notice;
pub mod session;
mod view;

pub use display::{MessageId, Phase, RenderedMessage, ViewSnapshot};
pub use view::{ChatView, ChatViewBuilder, Key};
