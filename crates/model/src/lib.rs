//! Domain types shared by the chat view and its backends.
//!
//! This crate establishes the contract between the chat view controller
//! and whatever serves the replies: the shape of a message, the session
//! identifier that scopes a conversation, and the outcome of a single
//! request. A backend may be a real HTTP endpoint or a scripted fake,
//! the controller should not be able to tell them apart.
//!
//! Types in this crate don't define any behavior beyond small accessors,
//! they are the constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod backend;
mod error;
mod lead;
mod message;
mod request;

pub use backend::*;
pub use error::*;
pub use lead::*;
pub use message::*;
pub use request::*;
