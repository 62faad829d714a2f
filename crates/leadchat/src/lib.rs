//! An out-of-the-box chat widget that talks to a lead chat backend over
//! HTTP.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you can
//! also use it as a library to bring the chat view into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod widget;

pub use leadchat_http_backend::ConfigError;
pub use widget::{Widget, WidgetBuilder};

/// Re-exports of [`leadchat_core`] crate.
pub mod core {
    pub use leadchat_core::*;
}
